//! Prompts that ask the model to answer in the section grammar the
//! extraction adapters read back.

use serde::{Deserialize, Serialize};

/// Who the analysis is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatientCategory {
    SelfAnalysis,
    Other,
}

impl PatientCategory {
    fn label(&self) -> &'static str {
        match self {
            Self::SelfAnalysis => "Self-analysis",
            Self::Other => "Analysis for another person",
        }
    }
}

/// The patient data collected before a symptom analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub age: u32,
    pub category: PatientCategory,
    #[serde(default)]
    pub previous_conditions: Option<String>,
    #[serde(default)]
    pub allergies: Option<String>,
    #[serde(default)]
    pub medications: Option<String>,
    pub symptoms: String,
}

impl PatientProfile {
    /// Render the profile as the patient block embedded in symptom prompts.
    pub fn to_prompt_block(&self) -> String {
        format!(
            "Patient Information:\n\
- Age: {} years\n\
- Category: {}\n\
- Previous Medical Conditions: {}\n\
- Known Allergies: {}\n\
- Current Medications: {}\n\
\n\
Current Symptoms:\n\
{}\n\
\n\
Please provide a comprehensive medical analysis considering the patient's age, medical history, allergies, and current medications when making recommendations.",
            self.age,
            self.category.label(),
            or_none_mentioned(&self.previous_conditions),
            or_none_mentioned(&self.allergies),
            or_none_mentioned(&self.medications),
            self.symptoms.trim(),
        )
    }
}

fn or_none_mentioned(value: &Option<String>) -> &str {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("None mentioned")
}

/// Which part of a symptom analysis to ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymptomFocus {
    #[default]
    Comprehensive,
    Tests,
    Treatments,
    Reasoning,
}

const CONDITIONS_TEMPLATE: &str = "✅ **Possible Condition(s):**
• [Condition 1] - Confidence: [High/Medium/Low]
  Reasoning: [Brief explanation considering age/history/medications]
• [Condition 2] - Confidence: [High/Medium/Low] ([percentage if applicable])
  Reasoning: [Brief explanation considering age/history/medications]";

const TESTS_TEMPLATE: &str = "🧪 **Recommended Tests:**
• [Test Name] - Purpose: [Brief purpose] - Urgency: [High/Medium/Low]
• [Test Name] - Purpose: [Brief purpose] - Urgency: [High/Medium/Low]";

const TREATMENTS_TEMPLATE: &str = "💊 **Treatment Recommendations:**
• [Treatment/Action] - [Brief explanation considering patient's profile]
• [Lifestyle modification] - [Age-appropriate recommendation]

🚨 **When to See a Doctor:**
• [Warning sign 1]
• [Warning sign 2]";

const REASONING_TEMPLATE: &str = "🧠 **Medical Reasoning:**
• [Age consideration] → [How it affects symptoms/treatment]
• [Medical history factor] → [Impact on current condition]
• [Medication consideration] → [Potential interactions or side effects]";

/// Prompt for a symptom analysis of `profile`.
pub fn symptom_prompt(profile: &PatientProfile, focus: SymptomFocus) -> String {
    let patient = profile.to_prompt_block();
    match focus {
        SymptomFocus::Comprehensive => format!(
            "You are an advanced clinical AI assistant trained to analyze human-reported symptoms while carefully considering the patient's complete medical profile.

**Patient Information Provided:**
{patient}

Consider the patient's age, previous conditions, current medications and known allergies in every recommendation.

**Provide analysis in this EXACT format:**

---

{CONDITIONS_TEMPLATE}

{TESTS_TEMPLATE}

{TREATMENTS_TEMPLATE}

{REASONING_TEMPLATE}

---

Never suggest treatments that conflict with listed allergies. Provide professional, comprehensive, and personalized medical guidance."
        ),
        SymptomFocus::Tests => format!(
            "Analyze symptoms and medical history, then suggest diagnostic tests:

{patient}

Respond in this EXACT format:

{TESTS_TEMPLATE}

Provide 2-4 most relevant tests considering patient's age and medical history."
        ),
        SymptomFocus::Treatments => format!(
            "Provide treatment recommendations for this patient:

{patient}

Respond in this EXACT format:

{TREATMENTS_TEMPLATE}

Consider age, allergies, and current medications. Be medically responsible."
        ),
        SymptomFocus::Reasoning => format!(
            "Explain the medical reasoning for this patient case:

{patient}

Respond in this EXACT format:

{REASONING_TEMPLATE}

Provide 3-4 key reasoning points considering patient's complete profile."
        ),
    }
}

/// Prompt sent with a scanned prescription image.
pub fn prescription_prompt() -> String {
    "You're a medical assistant analyzing a prescription scanned in image format. Your job is to:
1. Extract all medicines with dosage (if mentioned).
2. Suggest cheaper/generic alternatives for each medicine.
3. List the approximate market price (₹) of each medicine.
4. Provide a 1-line summary of the diagnosis/condition.
5. Summarize any short doctor advice (like \"Take rest\", \"Avoid salt\").

**Output format:**

🧾 **Medicines:**
• [Medicine 1] – [Dosage]
  ↪ Alternative: [Generic name]
  💰 Price: ₹[approx]

🔍 **Diagnosis/Condition:** [Short condition or disease]

📋 **Doctor's Advice:** [Short advice if present]

Be direct, compact, medically accurate. Don't invent extra information."
        .to_string()
}

/// Prompt sent with an X-ray or ultrasound image.
pub fn radiology_prompt(context: Option<&str>) -> String {
    let context = context
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|c| format!("\n**Patient context:** {c}\n"))
        .unwrap_or_default();
    format!(
        "You are a medical AI assistant trained to analyze X-rays and ultrasound scans and return precise, radiology-style findings in a compact, clinical format.

Analyze the uploaded image and return output in the following structure:

---

✅ **Findings:**
• [Key radiological observation 1]
• [Any abnormalities or normal variants]

🩺 **Possible Conditions/Interpretation:**
• [Most probable condition based on findings]
• [Alternative differential if applicable]

🧪 **Recommended Follow-up Tests:**
• [Further imaging or tests needed]

📋 **Radiologist-Style Impression:**
[1-2 line professional summary in radiology terminology]

---

Use precise radiological terminology, stay objective about visible findings and recommend appropriate follow-up.
{context}"
    )
}

/// Prompt for the free-form assistant chat.
pub fn assistant_prompt(question: &str) -> String {
    format!(
        "You are Aether, a friendly and knowledgeable medical AI assistant. You help with health and wellness questions in a warm, caring and professional tone.

User question: \"{}\"

Guidelines for your response:
- Use clear bullet points for lists and short paragraphs for explanations
- **Bold key points** when needed
- Always recommend consulting healthcare professionals for serious symptoms
- Never provide specific dosage recommendations
- For clearly unrelated topics, politely explain that you are a medical assistant and offer help with health questions

Please provide your helpful response now:",
        question.trim()
    )
}
