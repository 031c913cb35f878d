pub mod mailer;
pub mod pdf;
