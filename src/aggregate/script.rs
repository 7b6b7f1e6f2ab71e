//! Bot copy for each point in the dialog

use crate::relay::DeliveryOutcome;
use crate::value_objects::{ContactMethod, InquiryTone};

pub const GREETING: &str =
    "Hi there! 👋 Thanks for stopping by. I'm here to make sure your message reaches the right place.";

pub const INQUIRY_PROMPT: &str = "What brings you here today?";

/// Reply to the inquiry, ending in a request for the visitor's name
pub fn ask_name(tone: InquiryTone) -> &'static str {
    match tone {
        InquiryTone::Sales => {
            "Thanks for thinking of me. I'm always happy to hear about useful tools and services. Who am I speaking with?"
        }
        InquiryTone::Hiring => {
            "Great, it's always exciting to hear about new opportunities! May I have your name?"
        }
        InquiryTone::Project => {
            "Sounds interesting, I love hearing about new projects. What's your name?"
        }
        InquiryTone::Collaboration => {
            "Collaboration is one of my favourite things. Who do I have the pleasure of talking to?"
        }
        InquiryTone::General => "Nice to meet you! What's your name?",
    }
}

pub fn ask_company(name: &str, tone: InquiryTone) -> String {
    match tone {
        InquiryTone::Sales => format!("Thanks, {name}. Which company are you representing?"),
        _ => format!(
            "Nice to meet you, {name}! Are you reaching out on behalf of a company, or is this personal?"
        ),
    }
}

pub const CONTACT_PREFERENCE_PROMPT: &str = "How would you prefer to be contacted?";

pub const CONTACT_PREFERENCE_OPTIONS: [&str; 4] = ["email", "phone", "linkedin", "any"];

pub fn ask_contact_detail(method: ContactMethod) -> &'static str {
    match method {
        ContactMethod::Email => "Perfect. What's the best email address to reach you at?",
        ContactMethod::Phone => "Got it. What's the best phone number to reach you at?",
        ContactMethod::Linkedin => "Great. What's your LinkedIn profile URL?",
    }
}

pub const DETAILS_PROMPT: &str =
    "Almost done! In a sentence or two, what would you like to talk about?";

pub fn acknowledgement(outcome: DeliveryOutcome) -> &'static str {
    match outcome {
        DeliveryOutcome::Delivered => {
            "Thank you! Your message has been sent and I've been notified."
        }
        DeliveryOutcome::NotConfirmed => {
            "Thank you! Your message has been saved by my backup system and I'll still get it."
        }
    }
}

pub fn expected_response_time(tone: InquiryTone) -> &'static str {
    match tone {
        InquiryTone::Hiring => {
            "Hiring conversations are a priority, so expect to hear back within 24 hours."
        }
        InquiryTone::Project | InquiryTone::Collaboration => {
            "I'll review the details and get back to you within 1-2 business days."
        }
        InquiryTone::Sales => {
            "I'll take a look when I can. If it's a fit, I'll be in touch within a week."
        }
        InquiryTone::General => "I usually reply within 2-3 business days.",
    }
}

pub const THANK_YOU: &str = "Thanks again for taking the time to reach out. Talk soon!";

pub const FINAL_PROMPT: &str = "While you wait, feel free to look around:";
