//! Static English/Hindi string tables.

use serde::{Deserialize, Serialize};

use crate::session::StorageError;
use crate::traits::KeyValueStore;

pub const LANGUAGE_KEY: &str = "language";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Language::En),
            "hi" => Some(Language::Hi),
            _ => None,
        }
    }

    /// Pick from a locale tag like `hi-IN`; anything unsupported is English.
    pub fn from_device_locale(locale: &str) -> Self {
        let primary = locale.split(['-', '_']).next().unwrap_or_default();
        Self::from_code(&primary.to_ascii_lowercase()).unwrap_or_default()
    }

    /// Stored preference, else the device locale.
    pub fn resolve(store: &impl KeyValueStore, device_locale: &str) -> Result<Self, StorageError> {
        let stored = store.get(LANGUAGE_KEY)?;
        Ok(stored
            .as_deref()
            .and_then(Self::from_code)
            .unwrap_or_else(|| Self::from_device_locale(device_locale)))
    }

    pub fn persist(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        store.set(LANGUAGE_KEY, self.code())
    }
}

const EN: &[(&str, &str)] = &[
    ("title", "Simhastha e-move"),
    ("subtitle", "Smart E-Rickshaw and Mobility Management"),
    ("userLogin", "User Login"),
    ("addVehicle", "Add E-Rickshaw / Parking"),
    ("adminPanel", "Admin Panel"),
    ("getStarted", "Get Started"),
    ("language", "Language"),
    ("settings", "Settings"),
    ("login", "Login"),
    ("signup", "Sign Up"),
    ("logout", "Logout"),
    ("home", "Home"),
    ("profile", "Profile"),
    ("back", "Back"),
    ("continue", "Continue"),
    ("submit", "Submit"),
    ("cancel", "Cancel"),
    ("welcomeBack", "Welcome Back"),
    ("phoneNumber", "Phone Number"),
    ("password", "Password"),
    ("allowPermissions", "Allow Permissions"),
    ("locationPermission", "Location Permission"),
    ("locationDesc", "For finding nearest e-rickshaws and navigation"),
    ("dashboard", "Dashboard"),
    ("planRoute", "Plan Route"),
    ("liveTracker", "Live Tracker"),
    ("wallet", "Wallet"),
    ("rideHistory", "Ride History"),
    ("offers", "Offers"),
    ("support", "Support"),
    ("routePlannerTitle", "Route Planner"),
    ("fromLocation", "From location"),
    ("toLocation", "To location"),
    ("planRouteBtn", "Plan Route"),
    ("currentLocation", "Current Location"),
    ("destination", "Destination"),
    ("copyright", "© 2024 Simhastha e-move. All rights reserved."),
];

const HI: &[(&str, &str)] = &[
    ("title", "सिंहस्थ ई-मूव"),
    ("subtitle", "स्मार्ट ई-रिक्शा और मोबिलिटी मैनेजमेंट"),
    ("userLogin", "उपयोगकर्ता लॉगिन"),
    ("addVehicle", "ई-रिक्शा / पार्किंग जोड़ें"),
    ("adminPanel", "एडमिन पैनल"),
    ("getStarted", "शुरू करें"),
    ("language", "भाषा"),
    ("settings", "सेटिंग्स"),
    ("login", "लॉगिन"),
    ("signup", "साइन अप"),
    ("logout", "लॉगआउट"),
    ("home", "होम"),
    ("profile", "प्रोफाइल"),
    ("back", "वापस"),
    ("continue", "जारी रखें"),
    ("submit", "भेजें"),
    ("cancel", "रद्द करें"),
    ("welcomeBack", "वापस स्वागत है"),
    ("phoneNumber", "फोन नंबर"),
    ("password", "पासवर्ड"),
    ("allowPermissions", "अनुमतियां दें"),
    ("locationPermission", "स्थान की अनुमति"),
    ("locationDesc", "निकटतम ई-रिक्शा और नेविगेशन के लिए"),
    ("dashboard", "डैशबोर्ड"),
    ("planRoute", "रूट प्लान करें"),
    ("liveTracker", "लाइव ट्रैकर"),
    ("wallet", "वॉलेट"),
    ("rideHistory", "यात्रा इतिहास"),
    ("offers", "ऑफर"),
    ("support", "सहायता"),
    ("routePlannerTitle", "रूट प्लानर"),
    ("fromLocation", "कहाँ से"),
    ("toLocation", "कहाँ जाना है"),
    ("planRouteBtn", "रूट प्लान करें"),
    ("currentLocation", "वर्तमान स्थान"),
    ("destination", "गंतव्य"),
];

fn table(language: Language) -> &'static [(&'static str, &'static str)] {
    match language {
        Language::En => EN,
        Language::Hi => HI,
    }
}

fn lookup(language: Language, key: &str) -> Option<&'static str> {
    table(language)
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, text)| *text)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Translator {
    language: Language,
}

impl Translator {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Translation for `key`, then the English text, then the key itself.
    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        let found: Option<&'a str> = lookup(self.language, key).or_else(|| lookup(Language::En, key));
        found.unwrap_or(key)
    }
}
