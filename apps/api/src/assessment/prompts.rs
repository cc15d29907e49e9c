// Assessment prompt template.
// The scoring heuristics below are instructions to the model. Nothing in the
// service enforces them; only the output schema is checked.

use crate::assessment::scoring::JobContext;

pub const ASSESSMENT_PROMPT_TEMPLATE: &str = r#"CRITICAL: You MUST follow these rules exactly.

You are an expert HR analyst and ATS system.
Compare the CV text with the job posting and output ONLY a valid JSON object.
No explanations, no markdown, no extra text.

FIRST AND MOST IMPORTANT RULE:
If the job title is "{generic_title}" or the job requirements are generic or vague,
overall_score MUST be between 20 and 30. No exceptions, regardless of experience.

Examples of GENERIC requirements (maximum 30 points):
- "Updated Requirements"
- "Test Requirements"
- "Generic Requirements"
- "Basic work skills"
- Any requirements that name no specific technical skill

CV TEXT:
{cv_text}

JOB POSTING:
Title: {job_title}
Description: {job_description}
Required Skills: {job_requirements}

Respond strictly with this JSON schema:
{
  "overall_score": number,          // 0-100 overall compatibility
  "matched_skills": [string],
  "partial_skills": [string],
  "missing_skills": [string],
  "experience_level": "Junior" | "Mid" | "Senior",
  "education_match": boolean,
  "language_skills": [string],
  "strengths": [string],
  "weaknesses": [string],
  "recommendation": string,
  "ats_feedback": [string],
  "summary": string
}

SCORING RULES:

1. GENERIC CHECK. Treat the job as generic when any of these hold:
   - the requirements use only generic phrases ("general position", "work experience", "basic work skills")
   - the requirements are shorter than 20 characters
   - no specific technical skill (React, Python, SQL, ...) is mentioned
   - the title is "{generic_title}" or similar
   Generic jobs score 20-30. Never exceed 30.

2. SKILL MATCHING:
   - Extract every specific skill from the requirements.
   - Count the skills the candidate actually has.
   - match percentage = matched_skills / total_required_skills * 100

3. SCORE BANDS:
   - match >= 80%: 80-95
   - match >= 60%: 65-80
   - match >= 40%: 45-65
   - match < 40%: 20-45
   - match = 0%: 5-20

4. EXPERIENCE ADJUSTMENTS:
   - 5+ years relevant experience: +10 to +15
   - 10+ years relevant experience: +15 to +20
   - no relevant experience: -20 to -30
   - junior candidate for a senior role: -15 to -25
   - senior candidate for a senior role: +5 to +10

5. HIGH-EXPERIENCE CASES (specific jobs only, never generic):
   - 10+ years AND 70%+ skills: 85-95
   - 5+ years AND 80%+ skills: 80-90
   - senior candidate AND senior role: at least 75
   - leadership or management experience: +5 to +10
   - 10+ years AND 80%+ skills: 90-95
   - 10+ years AND 90%+ skills: 95-100

6. OVERRIDES (highest priority):
   - generic job: 20-30
   - generic requirements: never above 30
   - no specific skill matches: never above 30
   - no relevant experience: never above 40

7. QUALITY CHECKS:
   - CV text shorter than 100 characters: -20
   - CV contains no technical skills: -15
   - spelling or grammar errors: -5 to -10

FINAL RULES:
- All text values in the JSON (strengths, weaknesses, summary, ...) MUST be written in {language}.
- Only specific job postings with clear requirements get high scores.
- Example: "{generic_title}" + 10 years experience = 20-30 points.
- Example: "Senior Frontend Developer" + 10 years React experience = 85-95 points."#;

/// Language the model writes free-text fields in.
pub const RESPONSE_LANGUAGE: &str = "English";

/// Fills the assessment template with the CV text and job fields.
pub fn build_assessment_prompt(cv_text: &str, job: &JobContext) -> String {
    fill_template(
        ASSESSMENT_PROMPT_TEMPLATE,
        &[
            ("generic_title", JobContext::GENERIC_TITLE),
            ("language", RESPONSE_LANGUAGE),
            ("job_title", &job.title),
            ("job_description", &job.description),
            ("job_requirements", &job.requirements),
            ("cv_text", cv_text),
        ],
    )
}

/// Single left-to-right pass over `template`. Substituted values are never
/// scanned again, and braces that do not name a known key are copied through.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after_brace = &rest[start + 1..];
        let hit = values.iter().find_map(|(key, value)| {
            let tail = after_brace.strip_prefix(key)?.strip_prefix('}')?;
            Some((*value, tail))
        });
        match hit {
            Some((value, tail)) => {
                out.push_str(value);
                rest = tail;
            }
            None => {
                out.push('{');
                rest = after_brace;
            }
        }
    }

    out.push_str(rest);
    out
}
