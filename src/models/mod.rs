pub mod submission;

pub use submission::{FieldValue, SubmissionInput, SubmissionRecord};
