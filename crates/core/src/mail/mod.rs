mod extract;
mod types;

pub use extract::{
    decode_body_data, detail, extract_plain_text, header_value, summarize, MAX_RECENT_MAIL,
    NO_SUBJECT, SUMMARY_HEADERS,
};
pub use types::{
    GmailMessage, MailDetail, MailListing, MailSummary, MessageHeader, MessageList, MessagePart,
    MessagePartBody, MessageRef,
};
