//! Lexicon Store.
//!
//! Static, versioned word lists consumed by the analysis components.
//! Nothing here has behavior: the tables are loaded once into a [`Lexicon`]
//! and shared read-only (behind an `Arc`) by every component.
//!
//! Emergency patterns are regex fragments written against *normalized* text
//! (lowercase, punctuation replaced by spaces, apostrophes kept), see
//! [`super::normalize`]. Category and sentiment terms are plain words or
//! phrases; they go through the same normalization before matching.

use super::categories::HealthCategory;

/// Bumped whenever any table below changes.
pub const LEXICON_VERSION: &str = "1.2.0";

/// One emergency signal: an identifier plus the phrase patterns that raise it.
#[derive(Debug, Clone)]
pub struct EmergencySignal {
    pub id: &'static str,
    pub patterns: &'static [&'static str],
}

/// Keyword list for one health category.
#[derive(Debug, Clone)]
pub struct CategoryLexicon {
    pub category: HealthCategory,
    pub terms: &'static [&'static str],
}

/// Advice for a specific concern inside a category (e.g. headache).
#[derive(Debug, Clone)]
pub struct FocusAdvice {
    /// Category terms that select this advice when matched.
    pub terms: &'static [&'static str],
    pub advice: &'static [&'static str],
}

/// Advice templates for one category.
#[derive(Debug, Clone)]
pub struct CategoryAdvice {
    pub category: HealthCategory,
    pub focus: &'static [FocusAdvice],
    pub general: &'static [&'static str],
}

/// Weighted word lists for the rule-based sentiment strategy.
#[derive(Debug, Clone)]
pub struct SentimentLexicon {
    /// Signed valence per word.
    pub valence: &'static [(&'static str, f32)],
    /// Multipliers applied to the sentiment word immediately following.
    pub intensifiers: &'static [(&'static str, f32)],
    /// Words that flip the polarity of a sentiment word shortly after them.
    pub negations: &'static [&'static str],
}

/// Canned recommendation sentences.
#[derive(Debug, Clone)]
pub struct Recommendations {
    pub emergency: &'static str,
    pub medium_mental: &'static str,
    pub medium: &'static str,
    pub low_mental: &'static str,
    pub low_physical: &'static str,
    pub low: &'static str,
    pub fallback: &'static str,
    pub supportive: &'static str,
}

/// The complete set of tables used by one analyzer.
#[derive(Debug, Clone)]
pub struct Lexicon {
    pub version: &'static str,
    pub emergency_signals: Vec<EmergencySignal>,
    pub emergency_advice: &'static str,
    pub categories: Vec<CategoryLexicon>,
    pub sentiment: SentimentLexicon,
    pub advice: Vec<CategoryAdvice>,
    pub recommendations: Recommendations,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Lexicon {
    /// The built-in English lexicon.
    pub fn builtin() -> Self {
        Self {
            version: LEXICON_VERSION,
            emergency_signals: EMERGENCY_SIGNALS.to_vec(),
            emergency_advice: EMERGENCY_ADVICE,
            categories: CATEGORY_LEXICONS.to_vec(),
            sentiment: SentimentLexicon {
                valence: SENTIMENT_VALENCE,
                intensifiers: SENTIMENT_INTENSIFIERS,
                negations: SENTIMENT_NEGATIONS,
            },
            advice: CATEGORY_ADVICE.to_vec(),
            recommendations: RECOMMENDATIONS,
        }
    }

    /// Terms of one category (empty if the lexicon does not define it).
    pub fn terms_for(&self, category: HealthCategory) -> &[&'static str] {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.terms)
            .unwrap_or(&[])
    }

    /// Advice templates of one category, if any.
    pub fn advice_for(&self, category: HealthCategory) -> Option<&CategoryAdvice> {
        self.advice.iter().find(|a| a.category == category)
    }
}

const EMERGENCY_ADVICE: &str = "EMERGENCY: Call emergency services (911) immediately!";

const EMERGENCY_SIGNALS: &[EmergencySignal] = &[
    EmergencySignal {
        id: "chest_pain",
        patterns: &[
            r"chest\s+(?:pain|pains|tightness|pressure)",
            r"crushing\s+(?:pain|pressure)",
        ],
    },
    EmergencySignal {
        id: "heart_attack",
        patterns: &[r"heart\s+attack", r"cardiac\s+arrest"],
    },
    EmergencySignal {
        id: "stroke",
        patterns: &[
            r"stroke",
            r"face\s+(?:is\s+)?drooping",
            r"slurred\s+speech",
            r"sudden\s+numbness",
        ],
    },
    EmergencySignal {
        id: "severe_bleeding",
        patterns: &[
            r"(?:severe|heavy|uncontrolled)\s+bleeding",
            r"bleeding\s+(?:heavily|profusely|won't\s+stop|will\s+not\s+stop)",
        ],
    },
    EmergencySignal {
        id: "loss_of_consciousness",
        patterns: &[
            r"unconscious",
            r"unresponsive",
            r"passed\s+out",
            r"loss\s+of\s+consciousness",
        ],
    },
    EmergencySignal {
        id: "breathing_difficulty",
        patterns: &[
            r"(?:difficulty|trouble)\s+breathing",
            r"can'?t\s+breathe",
            r"can\s*not\s+breathe",
            r"unable\s+to\s+breathe",
            r"choking",
        ],
    },
    EmergencySignal {
        id: "suicidal_ideation",
        patterns: &[
            r"suicid(?:e|al)",
            r"kill\s+myself",
            r"end\s+my\s+life",
            r"want\s+to\s+die",
        ],
    },
    EmergencySignal {
        id: "severe_allergic_reaction",
        patterns: &[
            r"severe\s+allergic\s+reaction",
            r"anaphyla(?:xis|ctic)",
            r"throat\s+(?:is\s+)?(?:closing|swelling)",
        ],
    },
    EmergencySignal {
        id: "overdose_or_poisoning",
        patterns: &[r"overdos(?:e|ed|ing)", r"poison(?:ed|ing)"],
    },
    EmergencySignal {
        id: "severe_injury",
        patterns: &[
            r"severe\s+head\s+injury",
            r"broken\s+bones?",
            r"severe\s+burns?",
        ],
    },
    EmergencySignal {
        id: "seizure",
        patterns: &[r"seizures?", r"convulsions?"],
    },
    EmergencySignal {
        id: "declared_emergency",
        patterns: &[r"medical\s+emergency", r"call(?:ing)?\s+911"],
    },
];

const CATEGORY_LEXICONS: &[CategoryLexicon] = &[
    CategoryLexicon {
        category: HealthCategory::PhysicalSymptoms,
        terms: &[
            "headache", "fever", "cough", "sore throat", "nausea", "vomiting", "diarrhea",
            "fatigue", "dizziness", "chest pain", "shortness of breath", "back pain",
            "joint pain", "muscle pain", "abdominal pain", "stomach ache", "rash", "swelling",
            "bleeding", "bruising", "numbness", "tingling", "weakness", "pain", "hurt", "ache",
            "sick", "ill", "tired", "exhausted", "dizzy", "weak", "migraine", "cramps",
        ],
    },
    CategoryLexicon {
        category: HealthCategory::MentalHealth,
        terms: &[
            "anxiety", "depression", "stress", "panic", "worry", "sadness", "hopelessness",
            "irritability", "mood swings", "insomnia", "sleep problems", "concentration",
            "memory", "suicidal", "self harm", "eating disorder", "addiction", "overwhelmed",
            "anxious", "depressed", "stressed", "worried", "sad", "angry", "frustrated",
            "lonely", "hopeless", "nervous", "burnout",
        ],
    },
    CategoryLexicon {
        category: HealthCategory::ChronicConditions,
        terms: &[
            "diabetes", "hypertension", "high blood pressure", "asthma", "arthritis",
            "heart disease", "cancer", "thyroid", "kidney disease", "liver disease",
            "autoimmune", "copd", "epilepsy", "chronic", "condition", "medication",
            "treatment", "diagnosis", "diagnosed",
        ],
    },
    CategoryLexicon {
        category: HealthCategory::Lifestyle,
        terms: &[
            "diet", "exercise", "weight", "smoking", "alcohol", "sleep", "workout", "nutrition",
            "fitness", "obesity", "underweight", "sedentary", "food", "eat", "eating", "drinking",
            "active", "inactive", "rest", "energy", "healthy", "healthier", "habits",
        ],
    },
];

const SENTIMENT_VALENCE: &[(&str, f32)] = &[
    // positive
    ("good", 1.0),
    ("better", 1.2),
    ("great", 1.5),
    ("excellent", 2.0),
    ("happy", 1.5),
    ("glad", 1.2),
    ("relief", 1.2),
    ("relieved", 1.2),
    ("improving", 1.2),
    ("improved", 1.2),
    ("recovering", 1.0),
    ("fine", 0.8),
    ("well", 0.6),
    ("okay", 0.5),
    ("ok", 0.5),
    ("healthy", 1.0),
    ("healthier", 1.0),
    ("calm", 1.0),
    ("hopeful", 1.5),
    ("grateful", 1.5),
    ("strong", 0.8),
    ("energetic", 1.2),
    ("love", 1.5),
    // negative
    ("bad", -1.0),
    ("worse", -1.5),
    ("worst", -2.0),
    ("terrible", -2.0),
    ("awful", -2.0),
    ("horrible", -2.0),
    ("miserable", -2.0),
    ("unbearable", -2.5),
    ("pain", -1.0),
    ("painful", -1.5),
    ("hurt", -1.0),
    ("hurts", -1.0),
    ("sick", -1.0),
    ("ill", -1.0),
    ("suffering", -1.8),
    ("worry", -1.2),
    ("worried", -1.2),
    ("concerned", -1.0),
    ("scared", -1.5),
    ("afraid", -1.5),
    ("anxious", -1.5),
    ("panic", -1.5),
    ("stressed", -1.2),
    ("overwhelmed", -1.5),
    ("depressed", -2.0),
    ("sad", -1.5),
    ("lonely", -1.5),
    ("hopeless", -2.5),
    ("angry", -1.5),
    ("frustrated", -1.2),
    ("exhausted", -1.2),
    ("tired", -0.8),
];

const SENTIMENT_INTENSIFIERS: &[(&str, f32)] = &[
    ("very", 1.5),
    ("really", 1.4),
    ("extremely", 1.8),
    ("incredibly", 1.7),
    ("so", 1.3),
    ("too", 1.2),
    ("quite", 1.2),
    ("super", 1.4),
    ("severe", 1.6),
    ("severely", 1.6),
    ("constant", 1.3),
    ("constantly", 1.3),
    ("slightly", 0.6),
    ("somewhat", 0.7),
    ("mildly", 0.7),
    ("mild", 0.7),
    ("little", 0.7),
    ("bit", 0.7),
];

const SENTIMENT_NEGATIONS: &[&str] = &[
    "not", "no", "never", "don't", "dont", "doesn't", "didn't", "isn't", "wasn't", "aren't",
    "can't", "cannot", "won't", "without", "hardly", "nor", "neither",
];

const CATEGORY_ADVICE: &[CategoryAdvice] = &[
    CategoryAdvice {
        category: HealthCategory::PhysicalSymptoms,
        focus: &[
            FocusAdvice {
                terms: &["headache", "migraine"],
                advice: &[
                    "Try resting in a quiet, dark room to reduce stimulation",
                    "Stay well-hydrated with water throughout the day",
                    "If headaches persist or worsen, consult a healthcare provider",
                ],
            },
            FocusAdvice {
                terms: &["fever"],
                advice: &[
                    "Rest and drink plenty of fluids to stay hydrated",
                    "Monitor your temperature regularly",
                    "Seek medical attention if fever is very high or persists",
                ],
            },
            FocusAdvice {
                terms: &["cough", "sore throat"],
                advice: &[
                    "Stay hydrated to help thin mucus secretions",
                    "Consider a humidifier to add moisture to the air",
                    "See a healthcare provider if cough persists or worsens",
                ],
            },
            FocusAdvice {
                terms: &["fatigue", "tired", "exhausted"],
                advice: &[
                    "Ensure you're getting adequate sleep (7-9 hours nightly)",
                    "Maintain regular sleep and wake times",
                    "Eat nutritious, balanced meals regularly",
                ],
            },
            FocusAdvice {
                terms: &[
                    "pain", "back pain", "joint pain", "muscle pain", "abdominal pain", "ache",
                    "hurt",
                ],
                advice: &[
                    "Rest the affected area if possible",
                    "Apply ice for acute injuries or heat for muscle tension",
                    "Consult a healthcare provider for persistent or severe pain",
                ],
            },
        ],
        general: &[
            "Monitor your symptoms and consider consulting a healthcare provider",
            "Rest and stay hydrated while recovering",
        ],
    },
    CategoryAdvice {
        category: HealthCategory::MentalHealth,
        focus: &[
            FocusAdvice {
                terms: &["anxiety", "anxious", "panic", "nervous", "worry", "worried"],
                advice: &[
                    "Practice deep breathing exercises (4-7-8 technique)",
                    "Try progressive muscle relaxation",
                    "Limit caffeine intake, especially if sensitive",
                ],
            },
            FocusAdvice {
                terms: &["depression", "depressed", "sadness", "sad", "hopeless", "hopelessness"],
                advice: &[
                    "Try to maintain daily routines, even simple ones",
                    "Stay connected with supportive friends and family",
                    "Remember that depression is treatable - consider professional help",
                ],
            },
            FocusAdvice {
                terms: &["stress", "stressed", "overwhelmed", "burnout"],
                advice: &[
                    "Practice mindfulness or meditation techniques",
                    "Take regular breaks during demanding activities",
                    "Set realistic boundaries and prioritize self-care",
                ],
            },
        ],
        general: &[
            "Consider speaking with a mental health professional",
            "Practice self-care and reach out for support",
        ],
    },
    CategoryAdvice {
        category: HealthCategory::ChronicConditions,
        focus: &[
            FocusAdvice {
                terms: &["medication", "treatment"],
                advice: &[
                    "Take medications exactly as prescribed and keep a current list",
                    "Discuss side effects or missed doses with your doctor or pharmacist",
                ],
            },
            FocusAdvice {
                terms: &["diabetes"],
                advice: &[
                    "Monitor your blood sugar as your care team recommends",
                    "Keep regular check-ups to review your diabetes management plan",
                ],
            },
            FocusAdvice {
                terms: &["hypertension", "high blood pressure", "heart disease"],
                advice: &[
                    "Check your blood pressure regularly and record the readings",
                    "Limit salt intake and follow your cardiovascular care plan",
                ],
            },
        ],
        general: &[
            "Keep regular appointments with the provider managing your condition",
            "Track changes in your symptoms and share them at your next visit",
        ],
    },
    CategoryAdvice {
        category: HealthCategory::Lifestyle,
        focus: &[
            FocusAdvice {
                terms: &["diet", "food", "eat", "eating", "nutrition", "weight"],
                advice: &[
                    "Focus on whole foods: fruits, vegetables, lean proteins, whole grains",
                    "Limit processed foods, added sugars, and excessive fats",
                    "Consider consulting a registered dietitian for personalized guidance",
                ],
            },
            FocusAdvice {
                terms: &["exercise", "workout", "fitness", "active", "sedentary", "inactive"],
                advice: &[
                    "Start with activities you enjoy to build consistency",
                    "Aim for at least 150 minutes of moderate activity weekly",
                    "Begin gradually and progressively increase intensity",
                ],
            },
            FocusAdvice {
                terms: &["sleep", "rest"],
                advice: &[
                    "Maintain consistent sleep and wake times",
                    "Create a relaxing bedtime routine",
                    "Avoid screens and stimulating activities before bed",
                ],
            },
        ],
        general: &[
            "Consider making gradual, sustainable lifestyle changes",
            "Focus on one area of improvement at a time",
        ],
    },
];

const RECOMMENDATIONS: Recommendations = Recommendations {
    emergency: "Seek immediate medical attention or call emergency services",
    medium_mental: "Consider speaking with a mental health professional soon",
    medium: "Consider consulting a healthcare provider in the near future",
    low_mental: "Consider speaking with a mental health professional",
    low_physical: "Keep an eye on your symptoms and check in with a healthcare provider if needed",
    low: "Continue with healthy lifestyle practices and self-care",
    fallback: "Monitor how you feel and consult a healthcare provider if symptoms persist",
    supportive: "It's understandable to feel this way; reaching out to someone you trust can help",
};
