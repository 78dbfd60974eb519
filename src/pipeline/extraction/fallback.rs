/// Guarantee a list is never empty: when `items` is empty, append exactly
/// one sentinel from `sentinel`. Non-empty lists are returned untouched.
pub fn ensure_non_empty<T>(mut items: Vec<T>, sentinel: impl FnOnce() -> T) -> Vec<T> {
    if items.is_empty() {
        items.push(sentinel());
    }
    items
}

/// Applies the fallback policy across one record and remembers which
/// fields were backfilled, in the order they were checked.
#[derive(Debug, Default)]
pub struct Backfill {
    fields: Vec<String>,
}

impl Backfill {
    pub fn new() -> Self {
        Self::default()
    }

    /// `ensure_non_empty` for the list field `field`.
    pub fn list<T>(&mut self, field: &str, items: Vec<T>, sentinel: impl FnOnce() -> T) -> Vec<T> {
        if items.is_empty() {
            tracing::debug!(field, "Backfilling empty list with sentinel");
            self.fields.push(field.to_string());
        }
        ensure_non_empty(items, sentinel)
    }

    /// A scalar field: the extracted value when present and non-blank,
    /// otherwise `default`.
    pub fn scalar(&mut self, field: &str, value: Option<String>, default: &str) -> String {
        match value {
            Some(v) if !v.trim().is_empty() => v,
            _ => {
                tracing::debug!(field, "Using default for absent scalar field");
                self.fields.push(field.to_string());
                default.to_string()
            }
        }
    }

    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_gets_exactly_one_sentinel() {
        let out = ensure_non_empty(Vec::<String>::new(), || "sentinel".into());
        assert_eq!(out, vec!["sentinel"]);
    }

    #[test]
    fn non_empty_list_untouched_and_factory_not_called() {
        let out = ensure_non_empty(vec![1, 2], || panic!("factory must not run"));
        assert_eq!(out, vec![1, 2]);
    }

    #[test]
    fn backfill_records_fields_in_order() {
        let mut backfill = Backfill::new();
        let a = backfill.list("a", Vec::<u8>::new(), || 0);
        let b = backfill.list("b", vec![7u8], || 0);
        let c = backfill.scalar("c", None, "default");
        let d = backfill.scalar("d", Some("  ".into()), "blank");
        let e = backfill.scalar("e", Some("kept".into()), "unused");
        assert_eq!(a, vec![0]);
        assert_eq!(b, vec![7]);
        assert_eq!(c, "default");
        assert_eq!(d, "blank");
        assert_eq!(e, "kept");
        assert_eq!(backfill.into_fields(), vec!["a", "c", "d"]);
    }
}
