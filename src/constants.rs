// Status aliases (portal URL parameters use `soon` for upcoming calls)
pub const OPEN_ALIASES: &[&str] = &["open", "abierto"];
pub const UPCOMING_ALIASES: &[&str] = &["upcoming", "soon", "proximo", "próximo"];
pub const CLOSED_ALIASES: &[&str] = &["closed", "cerrado"];

// Beneficiary group aliases
pub const MUNICIPALITIES_ALIASES: &[&str] = &["municipalities", "municipios"];
pub const ORGANIZATIONS_ALIASES: &[&str] = &["organizations", "org"];
pub const PUBLIC_SERVICES_ALIASES: &[&str] = &["public-services", "publicservices", "servicios"];
pub const COMPANIES_ALIASES: &[&str] = &["companies", "empresas"];
pub const INDIVIDUALS_ALIASES: &[&str] = &["individuals", "personas"];

// Sort order aliases
pub const RELEVANCE_ALIASES: &[&str] = &["relevance"];
pub const OPEN_FIRST_ALIASES: &[&str] = &["openfirst", "open-first"];
pub const DATE_ALIASES: &[&str] = &["date"];
pub const ALPHABETICAL_ALIASES: &[&str] = &["alpha", "alphabetical"];

/// Region value that never narrows the result set.
pub const REGIONAL_SCOPE: &str = "regional";

/// Close date used for programs without one when sorting by date.
pub const FAR_FUTURE_CLOSE_DATE: &str = "9999-12-31";

// Search scoring weights
pub const SCORE_TITLE_EXACT: u32 = 100;
pub const SCORE_TITLE_PREFIX: u32 = 80;
pub const SCORE_TITLE_CONTAINS: u32 = 60;
pub const SCORE_KEYWORDS_PHRASE: u32 = 50;
pub const SCORE_DESCRIPTION_PHRASE: u32 = 40;
pub const SCORE_CONTENT_PHRASE: u32 = 30;
pub const SCORE_TITLE_TOKEN: u32 = 20;
pub const SCORE_KEYWORDS_TOKEN: u32 = 15;
pub const SCORE_CONTENT_TOKEN: u32 = 10;
pub const SCORE_DESCRIPTION_TOKEN: u32 = 5;

/// Tokens must be longer than this to earn per-token bonuses.
pub const MIN_TOKEN_CHARS: usize = 2;

// Page card selectors
pub const PROGRAM_CARD_SELECTOR: &str = "[data-program]";
pub const CARD_TITLE_SELECTOR: &str = "h3";
pub const CARD_META_SELECTOR: &str = ".meta";
pub const CARD_LINK_SELECTOR: &str = "a[href]";

/// Built-in catalog snapshot.
pub const BUILTIN_CATALOG: &str = include_str!("../data/programas.toml");
