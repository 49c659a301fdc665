// Prompt templates for the batch jobs.
// Each template asks for a numbered JSON object so answers land in stable columns.

/// Output instructions shared by every template.
const JSON_ANSWER_INSTRUCTION: &str = "Use British spelling instead of American spelling.
Provide output as a JSON object with the question number as the key and your response as the value.
Use double quotes and start and end with curly braces.
It is very important that you do not add introductory remarks.
Do NOT add introductory remarks in any circumstances.";

/// Job summary prompt. Replace `{answer_instruction}` and `{job_text}`.
const SHORTLIST_PROMPT_TEMPLATE: &str = r#"Given the job description below, extract summary information for the following pieces of information.
{answer_instruction}
    1. What is the role title?
    2. What is the recruitment consultancy?
    3. What is the company name?
    4. In what industry does the company operate?
    5. How many employees does the company have?
    6. Is it a startup environment or an established business?
    7. Is the role remote, hybrid or onsite?
    8. How many days onsite are expected?
    9. What is the location?
    10. What is the available salary range?
    11. Does the role involve line management, if so how many people?
    12. Does the role involve maintaining a funnel of projects including prioritisation?
    13. Does the role require a specialism in deep learning?
    14. Does the role require a specialism in computer vision?
    15. Does the role require a specialism in MLOps?
    16. How many years experience are required?
    17. What qualifications are required?
    18. Is the role focused more on analytics (e.g. requirements, feature engineering, model
        training) or engineering (MLOps, model deployment and maintenance, cloud platforms)?
    19. Are there any worrying points that would give you pause for thought?
    20. Are there any spelling mistakes in the job description?
    21. Give a brief summary of the main data and analytical tools used.
    22. Which cloud platforms are used?
    23. How many AI professionals already work there?
    24. Is it greenfield, building their AI capability from scratch?
    25. Speculate: what is their level of maturity for data ingestion and processing.
    26. Speculate: are the role responsibilities expecting too much for one person?
    27. Speculate: with the required skills and experience, do you think they are looking
        for a (metaphorical) unicorn?
    28. What is the sentiment on a scale of -3 to +3?
    29. How much does it inspire you on a scale of 1 to 10?
    30. What is the best thing about this job?
    31. Would you want to work there?
    32. Would this role make a positive difference?

Feel free to read between the lines and speculate based on what you've seen, but
return "Unknown" for a particular piece of information if it is not given.

Job description:
{job_text}"#;

/// CV comparison prompt. Replace `{answer_instruction}`, `{cv_text}` and `{job_text}`.
const COMPARE_PROMPT_TEMPLATE: &str = r#"Given the job description below, compare the CV against it and consider the following questions.
{answer_instruction}
    1. Do I have all the required skills?
    2. Do I have all the required qualifications?
    3. Is this job a good fit for me based on my CV?
    4. Am I over-qualified for this?
    5. Give me just an integer on a scale of 1 to 10 for how well my CV meets the requirements.
    6. Give me just an integer on a scale of 1 to 10 for how likely it is that I would be successful.
    7. Speculate: what's my chance of getting the gig if I apply with this CV, kid?
    8. Do you think I should I even apply?
    9. What (if anything) should be modified or added in the CV?
    10. What are my top three selling points that are relevant to the role?
    11. Write a brief draft cover letter.
    12. Write a very brief cover email for an online application.

CV:
{cv_text}

JOB DESCRIPTION:
{job_text}"#;

/// Article summary prompt. Replace `{answer_instruction}` and `{article_text}`.
const TOOLBOX_PROMPT_TEMPLATE: &str = r#"Given the article below, extract summary information for the following pieces of information.
{answer_instruction}
For 8 to 12, respond in one sentence.
For 13 to 15, respond in a few words.
    1. What is the title of the article?
    2. Who is the author?
    3. Which company or organisation is the author from?
    4. What is the date of the article?
    5. Are there any code examples (Yes or No)?
    6. Summarise the article in one sentence.
    7. Summarise the article in seven sentences.
    8. What is discussed?
    9. How does it work?
    10. Why is this relevant?
    11. What are the risks?
    12. What are the opportunities?
    13. What is the primary technique used?
    14. What is the primary tool used?
    15. What is the primary domain mentioned in the article?

Return "Unknown" for a particular piece of information if it is not given.

Article:
{article_text}"#;

pub fn shortlist_prompt(job_text: &str) -> String {
    SHORTLIST_PROMPT_TEMPLATE
        .replace("{answer_instruction}", JSON_ANSWER_INSTRUCTION)
        .replace("{job_text}", job_text)
}

pub fn compare_prompt(cv_text: &str, job_text: &str) -> String {
    // Job text first: the `{cv_text}` placeholder precedes it, so the second
    // replacement always hits the template rather than the inserted job text.
    COMPARE_PROMPT_TEMPLATE
        .replace("{answer_instruction}", JSON_ANSWER_INSTRUCTION)
        .replacen("{job_text}", job_text, 1)
        .replacen("{cv_text}", cv_text, 1)
}

pub fn toolbox_prompt(article_text: &str) -> String {
    TOOLBOX_PROMPT_TEMPLATE
        .replace("{answer_instruction}", JSON_ANSWER_INSTRUCTION)
        .replace("{article_text}", article_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortlist_prompt_has_all_questions_and_text() {
        let prompt = shortlist_prompt("Senior ML Engineer at Acme");
        assert!(prompt.contains("    32. Would this role make a positive difference?"));
        assert!(prompt.ends_with("Job description:\nSenior ML Engineer at Acme"));
        assert!(!prompt.contains("{answer_instruction}"));
    }

    #[test]
    fn test_compare_prompt_places_cv_before_job() {
        let prompt = compare_prompt("MY CV", "THE JOB");
        let cv_at = prompt.find("CV:\nMY CV").unwrap();
        let job_at = prompt.find("JOB DESCRIPTION:\nTHE JOB").unwrap();
        assert!(cv_at < job_at);
        assert!(prompt.contains("12. Write a very brief cover email"));
    }

    #[test]
    fn test_compare_prompt_does_not_expand_placeholders_inside_cv() {
        let prompt = compare_prompt("I wrote {job_text} templates", "THE JOB");
        assert!(prompt.contains("I wrote {job_text} templates"));
        assert!(prompt.contains("JOB DESCRIPTION:\nTHE JOB"));
    }

    #[test]
    fn test_toolbox_prompt_sentence_guidance() {
        let prompt = toolbox_prompt("An article about RAG");
        assert!(prompt.contains("For 13 to 15, respond in a few words."));
        assert!(prompt.contains("15. What is the primary domain"));
        assert!(prompt.ends_with("Article:\nAn article about RAG"));
    }
}
