//! Reply Templates
//!
//! Every user-visible reply is a template with `{placeholder}` variables,
//! overridable from the settings file under `templates:`.

use serde::{Deserialize, Serialize};

/// Reply templates keyed by scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplyTemplates {
    pub welcome: String,
    /// Header above the rendered job list
    pub jobs_header: String,
    /// One line per job: `{job_id}`, `{title}`, `{department}`, `{location}`, `{openings}`, `{contact_email}`
    pub job_line: String,
    pub no_openings: String,
    pub lookup_unavailable: String,
    /// `{job_id}`
    pub apply_prompt: String,
    pub invalid_job_id: String,
    /// `{job_id}`, `{title}`, `{date}`, `{time}`, `{location}`, `{interviewer}`
    pub interview_details: String,
    /// `{job_id}`
    pub interview_not_scheduled: String,
    pub apply_first: String,
    /// `{email}`
    pub contact_hr: String,
    /// `{job_id}`, `{destination}`
    pub resume_received: String,
    /// `{extension}`
    pub resume_rejected: String,
    pub upload_unexpected: String,
    pub delivery_failed: String,
    pub help: String,
    /// `{name}`, `{days}`
    pub annual_leave: String,
    /// `{name}`, `{days}`
    pub casual_leave: String,
    /// `{name}`, `{date}`
    pub joined_on: String,
    /// `{name}`
    pub joined_on_missing: String,
    pub employee_not_found: String,
    /// `{name}`
    pub leave_topics: String,
    /// `{employee_no}`
    pub leave_usage: String,
}

impl Default for ReplyTemplates {
    fn default() -> Self {
        Self {
            welcome: "Welcome to the HR assistant! Ask about job openings, apply with \
                      'apply for job id <number>', or ask about your interview."
                .to_string(),
            jobs_header: "Current job openings:".to_string(),
            job_line: "#{job_id} {title} ({department}, {location}) - {openings} opening(s)"
                .to_string(),
            no_openings: "There are no job openings right now. Please check back later."
                .to_string(),
            lookup_unavailable: "I can't reach our records right now. Please try again later."
                .to_string(),
            apply_prompt: "Thanks for applying to job {job_id}! Please upload your resume as a PDF."
                .to_string(),
            invalid_job_id: "Please include a numeric job id, e.g. 'apply for job id 101'."
                .to_string(),
            interview_details: "Interview for {title} (job {job_id}): {date} at {time}, \
                                {location}, with {interviewer}."
                .to_string(),
            interview_not_scheduled: "No interview has been scheduled for job {job_id} yet."
                .to_string(),
            apply_first: "Please apply for a job first, e.g. 'apply for job id 101'.".to_string(),
            contact_hr: "You can reach HR at {email}.".to_string(),
            resume_received: "Your resume for job {job_id} has been received and forwarded to \
                              {destination}."
                .to_string(),
            resume_rejected: "Only PDF resumes are accepted (got '{extension}'). Please upload a PDF."
                .to_string(),
            upload_unexpected: "I wasn't expecting a document. To apply, send \
                                'apply for job id <number>' first."
                .to_string(),
            delivery_failed: "Sorry, something went wrong on our side. Please try again later."
                .to_string(),
            help: "Sorry, I didn't understand. You can ask about 'job openings', \
                   'apply for job id <number>', 'interview' or 'contact hr'."
                .to_string(),
            annual_leave: "Hi {name}, your annual leave entitlement is {days} days.".to_string(),
            casual_leave: "Hi {name}, your casual leave entitlement is {days} days.".to_string(),
            joined_on: "Hi {name}, you joined the company on {date}.".to_string(),
            joined_on_missing: "Hi {name}, there is no joining date on record for you."
                .to_string(),
            employee_not_found: "Employee not found. Please check your employee number or name."
                .to_string(),
            leave_topics: "Hi {name}, you can ask about 'annual leave', 'casual leave' or \
                           'joining date'."
                .to_string(),
            leave_usage: "Please add your question after your employee number, \
                          e.g. '{employee_no} annual leave'."
                .to_string(),
        }
    }
}

/// Substitute `{name}` placeholders; unknown placeholders are left intact
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in vars {
        out = out.replace(&format!("{{{}}}", name), value);
    }
    out
}
