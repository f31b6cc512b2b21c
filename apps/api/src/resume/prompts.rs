// Resume extraction prompt. The field names here are the keys downstream code and
// the CSV header see, so they must stay literal.

pub const RESUME_PARSE_PROMPT: &str = "\
Please convert the text below into a complete JSON object with the following structure: \
{Name, Email, Phone, Location, Recent Role/Title, Summary, Skills: [], \
Education: [{university, degree, field_of_study, start_date, end_date}], \
Experience: [{job_title, company, location, start_date, end_date, job_summary}], \
Certifications: [{name, issuing_organization, issue_date, expiration_date, credential_id, credential_url}], \
Projects: [{name, description, start_date, end_date, role}], \
Publications: [{title, publisher, publication_date, url}], \
Languages: [{language, proficiency}], \
Volunteer: [{role, organization, cause, start_date, end_date, description}], \
Courses: [{name, institution}], \
Honors and Awards: [{title, issuer, date, description}], \
Work Authorization, Linkedin URL, GitHub URL, Personal Website URL}. \
Ensure that the 'Summary' field contains a visible and comprehensive summary.";

/// Prompt for one resume: the fixed template, a newline, then the extracted text.
pub fn build_prompt(extracted_text: &str) -> String {
    let mut prompt = String::with_capacity(RESUME_PARSE_PROMPT.len() + 1 + extracted_text.len());
    prompt.push_str(RESUME_PARSE_PROMPT);
    prompt.push('\n');
    prompt.push_str(extracted_text);
    prompt
}
