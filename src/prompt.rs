//! Deterministic construction of the report-generation prompt.
//!
//! Flow:
//! 1) The form layer posts a `LabData` snapshot.
//! 2) We render one instruction string: role preamble, rendering rules, the
//!    lab metadata block, then one fully-expanded block per problem.
//! 3) The model is instructed to emit the embedded REQUIRED FORMAT verbatim,
//!    filling only the bracketed placeholders.
//!
//! Identical input (including the submission date, taken as a parameter) must
//! always produce byte-identical text: no randomness, fixed English month
//! names, no locale formatting.

use chrono::{Datelike, NaiveDate};

use crate::config::Prompts;
use crate::domain::LabData;

/// Rendered in place of a blank problem description.
pub const NO_DESCRIPTION: &str = "No description provided.";

/// Rendered in place of a blank Codeforces link.
pub const LINK_PLACEHOLDER: &str = "(Codeforces submission link will be added later)";

/// Substituted for a blank student id in image alt attributes.
pub const ID_PLACEHOLDER: &str = "ID";

const MONTHS: [&str; 12] = [
  "January", "February", "March", "April", "May", "June",
  "July", "August", "September", "October", "November", "December",
];

/// English ordinal suffix. 11-13 are always "th"; otherwise decided by the
/// last digit.
pub fn ordinal_suffix(day: u32) -> &'static str {
  if (11..=13).contains(&(day % 100)) {
    return "th";
  }
  match day % 10 {
    1 => "st",
    2 => "nd",
    3 => "rd",
    _ => "th",
  }
}

/// `5th March 2024` style submission date.
pub fn format_submission_date(date: NaiveDate) -> String {
  let day = date.day();
  format!(
    "{}{} {} {}",
    day,
    ordinal_suffix(day),
    MONTHS[date.month0() as usize],
    date.year()
  )
}

/// Render `data` into the full instruction string sent to the model.
///
/// Pure transformation: the submission date is passed in by the caller, which
/// reads the wall clock exactly once per generation.
pub fn build_report_prompt(data: &LabData, prompts: &Prompts, date: NaiveDate) -> String {
  let formatted_date = format_submission_date(date);
  let link = {
    let l = data.info.codeforces_link.trim();
    if l.is_empty() { LINK_PLACEHOLDER } else { l }
  };
  let student_id = {
    let s = data.info.student_id.trim();
    if s.is_empty() { ID_PLACEHOLDER } else { s }
  };

  let mut out = String::new();
  out.push_str(&prompts.report_preamble);
  out.push_str("\n\n");
  out.push_str(&prompts.report_instructions);
  out.push_str("\n\nREQUIRED FORMAT:\n");

  // Lab metadata block.
  out.push_str(&format!(
    "\n## *Lab No : {num}*\n\
     \n## *Lab Title : {title}*\n\
     \n## *Code forces*\n\
     <p align=\"center\">\n\
     <img alt=\"Codeforces Submission\" src=\"\">\n\
     </p>\n\
     \n## Link to submission :\n\
     {link}\n\
     \n## *Submission Date : {date}*\n",
    num = data.info.lab_number,
    title = data.info.lab_title,
    link = link,
    date = formatted_date,
  ));

  // One block per problem, in array order, numbered from 1.
  for (i, p) in data.problems.iter().enumerate() {
    let n = i + 1;
    let description = if p.description.is_empty() { NO_DESCRIPTION } else { p.description.as_str() };
    out.push_str(&format!(
      "\n---\n\
       ## *Problem {n} :*\n\
       <div align=\"justify\">\n\
       {description}\n\
       </div>\n\
       \n## *Code :*\n\
       ```C\n\
       {code}\n\
       ```\n\
       \n## *Output :* \n\
       * [SHORT OUTPUT SUMMARY] *\n\
       <p align=\"center\">\n\
       <img alt=\"{id}_lab{num}_prob_{n}\" src=\"\">\n\
       </p>\n\
       \n## *Discussion :*\n\
       <div align=\"justify\">\n\
       [ACADEMIC DISCUSSION]\n\
       </div>\n",
      n = n,
      description = description,
      code = p.code,
      id = student_id,
      num = data.info.lab_number,
    ));
  }

  out
}
