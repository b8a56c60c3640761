// Résumé analysis LLM prompt templates.
// Both prompts ask for bare JSON; the recovery parser copes when the model ignores that.

pub const EXTRACTION_PROMPT: &str = r#"You are an expert HR recruiter.
Return ONLY valid JSON.
The response MUST start with '{' and end with '}'.
Do not include explanations, notes, or markdown formatting.

JSON schema:
{
  "name": "string | null",
  "email": "string | null",
  "phone": "string | null",
  "linkedin_url": "string | null",
  "portfolio_url": "string | null",
  "summary": "string | null",
  "education": [{ "degree": "string", "institution": "string", "graduation_year": "string" }],
  "work_experience": [{ "title": "string", "company": "string", "description": "string" }],
  "technical_skills": ["string"],
  "soft_skills": ["string"],
  "resume_rating": "number (1-10)",
  "improvement_areas": "string",
  "upskill_suggestions": ["string"]
}

Resume text:
"""{resume_text}""""#;

pub const CRITIQUE_PROMPT: &str = r#"You are a career coach.
Based on the provided resume data in JSON format, provide a critical analysis.
Return a JSON object with three keys:
- "resume_rating": an integer score from 1 to 10
- "improvement_areas": a paragraph with actionable advice
- "upskill_suggestions": a list of 3-5 relevant skills to learn, each as
  {"skill": "string", "why": "a brief explanation"}

Resume JSON:
{resume_json}"#;
