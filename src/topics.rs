//! Topic identifiers
//!
//! Quizzes run against a closed set of [`QuizTopic`]s. Chat practice
//! accepts any slug, so it only needs [`display_name`].

use crate::error::SecquizError;
use std::fmt;
use std::str::FromStr;

/// Supported multiple-choice quiz topics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuizTopic {
    PythonBasics,
    WebSecurity,
    Networking,
    LinuxSecurity,
    Cryptography,
    IncidentResponse,
}

impl QuizTopic {
    /// Every supported topic, in menu order
    pub const ALL: [QuizTopic; 6] = [
        QuizTopic::PythonBasics,
        QuizTopic::WebSecurity,
        QuizTopic::Networking,
        QuizTopic::LinuxSecurity,
        QuizTopic::Cryptography,
        QuizTopic::IncidentResponse,
    ];

    /// Slug sent to the service
    pub fn slug(&self) -> &'static str {
        match self {
            Self::PythonBasics => "python_basics",
            Self::WebSecurity => "web_security",
            Self::Networking => "networking",
            Self::LinuxSecurity => "linux_security",
            Self::Cryptography => "cryptography",
            Self::IncidentResponse => "incident_response",
        }
    }

    /// Human-readable title
    pub fn title(&self) -> &'static str {
        match self {
            Self::PythonBasics => "Python Basics",
            Self::WebSecurity => "Web Security",
            Self::Networking => "Networking",
            Self::LinuxSecurity => "Linux Security",
            Self::Cryptography => "Cryptography",
            Self::IncidentResponse => "Incident Response",
        }
    }
}

impl fmt::Display for QuizTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for QuizTopic {
    type Err = SecquizError;

    /// Parse a topic slug, case-insensitively
    ///
    /// # Examples
    ///
    /// ```
    /// use secquiz::topics::QuizTopic;
    ///
    /// let topic: QuizTopic = "Web_Security".parse().unwrap();
    /// assert_eq!(topic, QuizTopic::WebSecurity);
    /// assert!("astrology".parse::<QuizTopic>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.slug() == wanted)
            .ok_or_else(|| SecquizError::InvalidTopic(s.to_string()))
    }
}

/// Turn a slug like `phishing_detection` into `Phishing Detection`
pub fn display_name(slug: &str) -> String {
    slug.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Letter shown next to an option id (`1 -> 'A'`)
///
/// Returns `'?'` for ids outside `1..=26`.
pub fn option_letter(option_id: u32) -> char {
    if (1..=26).contains(&option_id) {
        char::from(b'A' + (option_id - 1) as u8)
    } else {
        '?'
    }
}

/// Option id for a letter typed by the user (`'b' -> 2`)
pub fn option_id_from_letter(letter: char) -> Option<u32> {
    let upper = letter.to_ascii_uppercase();
    if upper.is_ascii_uppercase() {
        Some(u32::from(upper as u8 - b'A') + 1)
    } else {
        None
    }
}
