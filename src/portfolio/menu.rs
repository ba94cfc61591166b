use rustc_hash::FxHashMap;

/// Placeholder replaced by the visitor's name in canned replies.
pub const NAME_PLACEHOLDER: &str = "<amigo>";

pub const GREETING_TEMPLATE: &str =
    "Nice to meet you, <amigo>!\nI'm really glad you landed in my portfolio. I hope you enjoy it and it makes you smile.";

const MENU_TO_ANIMATION: &[(&str, &str)] = &[
    ("Home (default)", "walk"),
    ("Transition HOME to WORK", "backflip"),
    ("Who's Portuga?", "spining"),
    ("Proudest work?", "idle"),
    ("Any awards?", "dance01"),
    ("Brands you touched?", "hifive"),
    ("Where are you now?", "hi"),
    ("Sneaker count?", "dance02"),
    ("Sneakers count?", "dance02"),
    ("Why Portuga?", "yes"),
    ("Let's get a coffee?", "cellphonewalk"),
];

const MENU_PREDEFINED_REPLIES: &[(&str, &str)] = &[
    (
        "Who's Portuga?",
        "A Brazilian creative with 25+ years of multicultural experience across Brazil, UK, Singapore, and US, grounded in ideas, art direction, innovation and business solutions, fueled by smiles and passion. I've led global brands, built cool client relationships, and grown teams that, EOD, became good friends.",
    ),
    (
        "Any awards?",
        "Yes, a few — maybe 90 so far, including #Cannes, One Show, Webby, New York Festivals, and Lürzer's Archive. I've also been a judge for the Effies, Webbys, and a few others. Tbh, <amigo>, awards were never the goal, just a natural consequence of courage, focus on solving client problems, and creative criteria.",
    ),
    (
        "Brands you touched?",
        "Roughly 130 brands, from Samsung, Stellantis, Mondelez, Citi, Abott, L'Oréal, Uniliver, Mars, Google, Asics, Sony, KPMG, Cartoon, Dow, Moët and McDonald's. But <amigo> the real joy is the human side, meeting clients, working closely, talking ideas, business, life, and occasionally a bit of nonsense.",
    ),
    (
        "Where are you now?",
        "Right now, I'm a VP, Group Creative Director at Razorfish New York. Along the way, I've worked at Sapient, RAPP, MullenLowe, Y&R, and some boutique agencies. Fun fact: my first-ever job was at the Brazilian Yellow Pages. Can you believe it <amigo>? Lol",
    ),
    (
        "Sneakers count?",
        "God <amigo>! My wife wants to kill me over my 92 pairs of sneakers. But my alibi is that my therapist says my collection is my natural way to show my never-ending willingness to explore the world. Totally makes sense.",
    ),
    (
        "Why Portuga?",
        "Because <amigo>, I care deeply about what I deliver and work hard to bring good shit to life. It's definitely not my style to overcomplicate things — it's literally tattooed on me: \"More brain, less storm.\" And, most importantly, using creativity to make brands and consumers smile together.",
    ),
    (
        "Let's get a coffee?",
        "Sure, sure, sure <amigo>! But sorry, I hate coffee. We can go for a tea or a Portuguese wine instead. Just reach me at +1 347 820 0044 or smile@danielportuga.com Sounds like a fun plan, right?",
    ),
];

/// How a menu pick is answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuResponse {
    /// Canned text with the visitor's name already substituted.
    Predefined(String),
    /// No canned text; ask the chat backend with the label as the question.
    AskChat(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuAction {
    /// Clip to crossfade to, if the label maps to one.
    pub animation: Option<String>,
    pub response: MenuResponse,
}

/// Menu label → animation clip and canned reply.
#[derive(Debug, Clone)]
pub struct MenuTable {
    animations: FxHashMap<String, String>,
    replies: FxHashMap<String, String>,
}

impl Default for MenuTable {
    fn default() -> Self {
        Self::from_pairs(MENU_TO_ANIMATION, MENU_PREDEFINED_REPLIES)
    }
}

impl MenuTable {
    #[must_use]
    pub fn from_pairs(animations: &[(&str, &str)], replies: &[(&str, &str)]) -> Self {
        Self {
            animations: animations.iter().map(|&(k, v)| (k.to_string(), v.to_string())).collect(),
            replies: replies.iter().map(|&(k, v)| (k.to_string(), v.to_string())).collect(),
        }
    }

    #[must_use]
    pub fn animation_for(&self, label: &str) -> Option<&str> {
        self.animations.get(label).map(String::as_str)
    }

    /// Canned reply for `label` with every placeholder replaced by `name`.
    #[must_use]
    pub fn predefined_reply(&self, label: &str, name: &str) -> Option<String> {
        self.replies.get(label).map(|reply| substitute_name(reply, name))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.animations.keys().map(String::as_str)
    }

    /// Resolves a menu click.
    #[must_use]
    pub fn select(&self, label: &str, name: &str) -> MenuAction {
        let response = match self.predefined_reply(label, name) {
            Some(text) => MenuResponse::Predefined(text),
            None => MenuResponse::AskChat(label.to_string()),
        };
        MenuAction {
            animation: self.animation_for(label).map(str::to_string),
            response,
        }
    }
}

/// The default answer box text for a visitor.
#[must_use]
pub fn greeting(name: &str) -> String {
    substitute_name(GREETING_TEMPLATE, name)
}

fn substitute_name(text: &str, name: &str) -> String {
    text.replace(NAME_PLACEHOLDER, name.trim())
}
