// src/extractors/tagger.rs

// --- Imports ---
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable naming the pretrained tokenizer binary.
pub const TAGGER_MODEL_ENV: &str = "ATTR_EXTRACTOR_TAGGER_MODEL";
/// File name of the pretrained tokenizer under the user data directory.
pub const TAGGER_MODEL_FILE: &str = "en_tokenizer.bin";
const DATA_SUBDIR: &str = "attr_extractor";

// --- Data Structures ---

/// Universal part-of-speech tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosTag {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Sym,
    Verb,
    X,
}

impl PosTag {
    /// Maps a Penn Treebank tag (as emitted by most English taggers) to its universal tag.
    #[cfg_attr(not(feature = "nlprule-tagger"), allow(dead_code))]
    pub fn from_penn(tag: &str) -> PosTag {
        match tag {
            "NNP" | "NNPS" => PosTag::Propn,
            "NN" | "NNS" => PosTag::Noun,
            "JJ" | "JJR" | "JJS" => PosTag::Adj,
            "RB" | "RBR" | "RBS" | "WRB" => PosTag::Adv,
            "MD" => PosTag::Aux,
            "CC" => PosTag::Cconj,
            "DT" | "PDT" | "WDT" => PosTag::Det,
            "UH" => PosTag::Intj,
            "CD" => PosTag::Num,
            "POS" | "RP" | "TO" => PosTag::Part,
            "PRP" | "PRP$" | "WP" | "WP$" | "EX" => PosTag::Pron,
            "IN" => PosTag::Adp,
            "SYM" | "$" | "#" => PosTag::Sym,
            "." | "," | ":" | "``" | "''" | "-LRB-" | "-RRB-" | "HYPH" => PosTag::Punct,
            t if t.starts_with("VB") => PosTag::Verb,
            _ => PosTag::X,
        }
    }

    /// Picks the tag of a token from the readings a tagger left after disambiguation.
    ///
    /// A proper-noun reading wins over any other, so a brand that is also an
    /// ordinary word ("Apple", "Acer") still counts as a brand. Otherwise the
    /// first non-empty reading is used.
    #[cfg_attr(not(feature = "nlprule-tagger"), allow(dead_code))]
    pub fn from_penn_readings<'a>(readings: impl IntoIterator<Item = &'a str>) -> PosTag {
        let mut first = None;
        for reading in readings {
            if reading.is_empty() {
                continue;
            }
            if matches!(reading, "NNP" | "NNPS") {
                return PosTag::Propn;
            }
            first.get_or_insert(reading);
        }
        first.map_or(PosTag::X, PosTag::from_penn)
    }
}

/// A token of a line together with its part-of-speech tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    pub text: String,
    pub tag: PosTag,
}

impl TaggedToken {
    pub fn new(text: impl Into<String>, tag: PosTag) -> Self {
        Self { text: text.into(), tag }
    }
}

/// A part-of-speech tagger for a single line of English text.
///
/// Implementations are constructed once (model loading can be expensive) and are
/// read-only afterwards; the extractor borrows one for every line it scans.
pub trait PosTagger: Send + Sync {
    /// Short identifier recorded in run metadata.
    fn name(&self) -> &str;

    /// Tags the tokens of `line` in order.
    fn tag(&self, line: &str) -> Vec<TaggedToken>;
}

// --- Lexicon (Lazy Static) ---
// Closed-class words plus the common catalog vocabulary that shows up capitalized
// at the start of a line. Anything capitalized that is not listed here is a proper noun.
static LEXICON: Lazy<HashMap<&'static str, PosTag>> = Lazy::new(|| {
    let mut lexicon = HashMap::new();
    let mut add = |tag: PosTag, words: &[&'static str]| {
        for word in words {
            lexicon.entry(*word).or_insert(tag);
        }
    };

    add(PosTag::Det, &[
        "a", "an", "the", "this", "that", "these", "those", "each", "every", "some", "any",
        "no", "all", "both", "either", "neither", "another", "such", "what", "which", "whose",
    ]);
    add(PosTag::Pron, &[
        "i", "me", "my", "mine", "you", "your", "yours", "he", "him", "his", "she", "her",
        "hers", "it", "its", "we", "us", "our", "ours", "they", "them", "their", "theirs",
        "myself", "yourself", "itself", "ourselves", "themselves", "who", "whom",
        "something", "anything", "nothing", "everything", "someone", "anyone", "everyone",
    ]);
    add(PosTag::Adp, &[
        "of", "in", "on", "at", "by", "for", "with", "from", "to", "into", "onto", "over",
        "under", "about", "above", "below", "between", "among", "through", "during",
        "before", "after", "against", "without", "within", "along", "across", "behind",
        "beyond", "near", "per", "via", "upon", "off", "out", "up", "down", "around",
        "like", "than", "since", "until",
    ]);
    add(PosTag::Cconj, &["and", "or", "but", "nor", "yet", "so", "plus"]);
    add(PosTag::Sconj, &[
        "if", "because", "although", "though", "while", "whereas", "unless", "whether", "as",
    ]);
    add(PosTag::Aux, &[
        "is", "are", "was", "were", "be", "been", "being", "am", "do", "does", "did", "have",
        "has", "had", "will", "would", "shall", "should", "can", "could", "may", "might",
        "must",
    ]);
    add(PosTag::Part, &["not", "n't"]);
    add(PosTag::Adv, &[
        "just", "only", "also", "very", "really", "too", "quite", "rather", "almost",
        "always", "never", "often", "sometimes", "here", "there", "now", "then", "today",
        "still", "even", "ever", "already", "again", "soon", "well", "however", "more",
        "most", "less", "least", "further", "finally", "currently",
    ]);
    add(PosTag::Adj, &[
        "new", "old", "good", "best", "better", "great", "high", "low", "fast", "slow",
        "big", "small", "large", "random", "available", "latest", "cheap", "affordable",
        "premium", "powerful", "lightweight", "portable", "thin", "light", "excellent",
        "refurbished", "used", "original", "free", "total", "special", "limited",
    ]);
    add(PosTag::Noun, &[
        "laptop", "laptops", "notebook", "notebooks", "computer", "computers", "desktop",
        "tablet", "phone", "price", "prices", "sale", "model", "models", "spec", "specs",
        "processor", "cpu", "memory", "storage", "ram", "ssd", "hdd", "gb", "tb", "mb",
        "ghz", "display", "screen", "inch", "inches", "battery", "sentence", "item",
        "items", "product", "products", "offer", "deal", "deals", "discount", "warranty",
        "gaming", "edition", "series", "catalog", "page", "note", "notes", "summary",
    ]);
    add(PosTag::Verb, &[
        "get", "buy", "order", "call", "contact", "see", "check", "visit", "includes",
        "include", "featuring", "features", "comes", "come", "ships", "save", "shop",
    ]);
    add(PosTag::Intj, &["hello", "hi", "yes", "ok", "okay", "please", "thanks"]);
    add(PosTag::Num, &[
        "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    ]);
    add(PosTag::Sym, &["&"]);

    lexicon
});

// --- Rule Tagger ---

/// Deterministic lexicon-and-shape English tagger.
///
/// Splits on whitespace, detaches surrounding punctuation, currency symbols and the
/// possessive `'s`, then tags each piece: lexicon words by their class, numbers as
/// `NUM`, alphanumeric spec tokens (`16GB`, `i5`) as `NOUN`, other capitalized words
/// as `PROPN` and everything else as `NOUN`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleTagger;

impl RuleTagger {
    pub fn new() -> Self {
        Self
    }

    fn tag_word(word: &str) -> PosTag {
        if word.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.')
            && word.chars().any(|c| c.is_ascii_digit())
        {
            return PosTag::Num;
        }
        if word.chars().any(|c| c.is_ascii_digit()) {
            return PosTag::Noun;
        }
        if let Some(tag) = LEXICON.get(word.to_lowercase().as_str()) {
            return *tag;
        }
        match word.chars().next() {
            Some(c) if c.is_uppercase() => PosTag::Propn,
            Some(c) if c.is_alphabetic() => PosTag::Noun,
            _ => PosTag::X,
        }
    }

    fn tag_symbol(c: char) -> PosTag {
        match c {
            '$' | '€' | '£' | '¥' | '%' | '+' | '=' | '<' | '>' | '#' | '&' | '@' | '*' | '~'
            | '^' | '|' => PosTag::Sym,
            _ => PosTag::Punct,
        }
    }
}

impl PosTagger for RuleTagger {
    fn name(&self) -> &str {
        "rule"
    }

    fn tag(&self, line: &str) -> Vec<TaggedToken> {
        let mut tokens = Vec::new();

        for chunk in line.split_whitespace() {
            let is_edge = |c: char| !c.is_alphanumeric();

            // Leading punctuation / currency, one token per character
            let core_start = chunk.find(|c: char| !is_edge(c)).unwrap_or(chunk.len());
            for c in chunk[..core_start].chars() {
                tokens.push(TaggedToken::new(c.to_string(), Self::tag_symbol(c)));
            }
            let rest = &chunk[core_start..];

            // Trailing punctuation, kept for after the core word
            let core_end = rest.rfind(|c: char| !is_edge(c)).map_or(0, |i| {
                i + rest[i..].chars().next().map_or(0, char::len_utf8)
            });
            let (mut core, trailing) = rest.split_at(core_end);

            let mut possessive = None;
            for suffix in ["'s", "’s", "'S"] {
                if core.len() > suffix.len() && core.ends_with(suffix) {
                    possessive = Some(&core[core.len() - suffix.len()..]);
                    core = &core[..core.len() - suffix.len()];
                    break;
                }
            }

            if !core.is_empty() {
                tokens.push(TaggedToken::new(core, Self::tag_word(core)));
            }
            if let Some(suffix) = possessive {
                tokens.push(TaggedToken::new(suffix, PosTag::Part));
            }
            for c in trailing.chars() {
                tokens.push(TaggedToken::new(c.to_string(), Self::tag_symbol(c)));
            }
        }

        tracing::trace!("Tagged {} tokens in line '{}'", tokens.len(), line);
        tokens
    }
}

// --- nlprule Tagger (optional) ---

/// Pretrained English tagger backed by an nlprule tokenizer binary
/// (e.g. `en_tokenizer.bin`). Loaded once, then shared read-only.
#[cfg(feature = "nlprule-tagger")]
pub struct NlpruleTagger {
    tokenizer: nlprule::Tokenizer,
}

#[cfg(feature = "nlprule-tagger")]
impl NlpruleTagger {
    pub fn load(path: &Path) -> Result<Self, ExtractError> {
        tracing::info!("Loading nlprule tokenizer model from {}", path.display());
        let tokenizer = nlprule::Tokenizer::new(path)
            .map_err(|e| ExtractError::TaggerInit(format!("{}: {}", path.display(), e)))?;
        Ok(Self { tokenizer })
    }
}

#[cfg(feature = "nlprule-tagger")]
impl PosTagger for NlpruleTagger {
    fn name(&self) -> &str {
        "nlprule"
    }

    fn tag(&self, line: &str) -> Vec<TaggedToken> {
        let mut tokens = Vec::new();
        for sentence in self.tokenizer.pipe(line) {
            for token in sentence.tokens() {
                let text = token.word().text().as_str();
                // Sentence-start marker tokens carry no text
                if text.trim().is_empty() {
                    continue;
                }
                let tag = PosTag::from_penn_readings(
                    token.word().tags().iter().map(|data| data.pos().as_str()),
                );
                tokens.push(TaggedToken::new(text, tag));
            }
        }
        tokens
    }
}

// --- Tagger Selection ---

/// Where the pretrained tokenizer model comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelLocation {
    /// Named with `--tagger-model` or the environment; failing to load it is an error.
    Explicit(PathBuf),
    /// Found in the user data directory.
    Default(PathBuf),
    /// No model anywhere.
    Missing,
}

impl ModelLocation {
    /// Resolves the model path: command line first, then the environment, then
    /// `<data_dir>/attr_extractor/en_tokenizer.bin` if that file exists.
    pub fn locate(cli: Option<&Path>, env: Option<OsString>, data_dir: Option<PathBuf>) -> Self {
        if let Some(path) = cli {
            return ModelLocation::Explicit(path.to_path_buf());
        }
        if let Some(path) = env.filter(|p| !p.is_empty()) {
            return ModelLocation::Explicit(PathBuf::from(path));
        }
        match data_dir.map(|dir| dir.join(DATA_SUBDIR).join(TAGGER_MODEL_FILE)) {
            Some(path) if path.is_file() => ModelLocation::Default(path),
            _ => ModelLocation::Missing,
        }
    }

    pub fn from_environment(cli: Option<&Path>) -> Self {
        Self::locate(cli, std::env::var_os(TAGGER_MODEL_ENV), dirs::data_dir())
    }
}

/// Builds the tagger used for brand detection.
///
/// The pretrained model is the normal path. `RuleTagger` is used only when no
/// model is available (or a default-location model fails to load), with a warning.
pub fn build_tagger(location: &ModelLocation) -> Result<Box<dyn PosTagger>, ExtractError> {
    match location {
        #[cfg(feature = "nlprule-tagger")]
        ModelLocation::Explicit(path) => Ok(Box::new(NlpruleTagger::load(path)?)),
        #[cfg(feature = "nlprule-tagger")]
        ModelLocation::Default(path) => match NlpruleTagger::load(path) {
            Ok(tagger) => Ok(Box::new(tagger)),
            Err(e) => {
                tracing::warn!("{}; falling back to the rule tagger", e);
                Ok(Box::new(RuleTagger::new()))
            }
        },
        #[cfg(not(feature = "nlprule-tagger"))]
        ModelLocation::Explicit(path) | ModelLocation::Default(path) => {
            tracing::warn!(
                "Built without nlprule-tagger, ignoring model {}; using the rule tagger",
                path.display()
            );
            Ok(Box::new(RuleTagger::new()))
        }
        ModelLocation::Missing => {
            tracing::warn!(
                "No tagger model found (set --tagger-model, {} or place {} in the data directory); \
                 using the rule tagger, which treats any unknown capitalized word as a brand",
                TAGGER_MODEL_ENV,
                TAGGER_MODEL_FILE
            );
            Ok(Box::new(RuleTagger::new()))
        }
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn tags(line: &str) -> Vec<(String, PosTag)> {
        RuleTagger::new()
            .tag(line)
            .into_iter()
            .map(|t| (t.text, t.tag))
            .collect()
    }

    fn first_propn(line: &str) -> Option<String> {
        RuleTagger::new()
            .tag(line)
            .into_iter()
            .find(|t| t.tag == PosTag::Propn)
            .map(|t| t.text)
    }

    #[test]
    fn test_catalog_line_brand_is_first_proper_noun() {
        assert_eq!(
            first_propn("Dell Inspiron i5 16GB RAM 512GB SSD $799").as_deref(),
            Some("Dell")
        );
        assert_eq!(first_propn("New Lenovo ThinkPad, i7").as_deref(), Some("Lenovo"));
    }

    #[test]
    fn test_plain_sentence_has_no_proper_noun() {
        assert_eq!(first_propn("Just a random sentence."), None);
        assert_eq!(first_propn(""), None);
        assert_eq!(first_propn("   "), None);
    }

    #[test]
    fn test_price_splits_currency_symbol() {
        let tagged = tags("$799.");
        assert_eq!(
            tagged,
            vec![
                ("$".to_string(), PosTag::Sym),
                ("799".to_string(), PosTag::Num),
                (".".to_string(), PosTag::Punct),
            ]
        );
    }

    #[test]
    fn test_possessive_and_spec_tokens() {
        let tagged = tags("Apple's 16GB i5-12400");
        assert_eq!(tagged[0], ("Apple".to_string(), PosTag::Propn));
        assert_eq!(tagged[1], ("'s".to_string(), PosTag::Part));
        assert_eq!(tagged[2], ("16GB".to_string(), PosTag::Noun));
        assert_eq!(tagged[3], ("i5-12400".to_string(), PosTag::Noun));
    }

    #[test]
    fn test_hardware_units_are_not_brands() {
        assert_eq!(first_propn("RAM SSD HDD GB"), None);
        assert_eq!(first_propn("16GB RAM, 1TB HDD"), None);
    }

    #[test]
    fn test_tagging_is_deterministic() {
        let line = "HP Pavilion i7 8GB RAM 1TB HDD $650";
        assert_eq!(tags(line), tags(line));
    }

    #[test]
    fn test_penn_mapping() {
        assert_eq!(PosTag::from_penn("NNP"), PosTag::Propn);
        assert_eq!(PosTag::from_penn("NNPS"), PosTag::Propn);
        assert_eq!(PosTag::from_penn("VBZ"), PosTag::Verb);
        assert_eq!(PosTag::from_penn("CD"), PosTag::Num);
        assert_eq!(PosTag::from_penn("???"), PosTag::X);
    }

    #[test]
    fn test_proper_noun_reading_wins() {
        assert_eq!(PosTag::from_penn_readings(["NN", "NNP"]), PosTag::Propn);
        assert_eq!(PosTag::from_penn_readings(["", "VB", "NNPS"]), PosTag::Propn);
        assert_eq!(PosTag::from_penn_readings(["", "VBZ", "NNS"]), PosTag::Verb);
        assert_eq!(PosTag::from_penn_readings(["", ""]), PosTag::X);
        assert_eq!(PosTag::from_penn_readings(Vec::<&str>::new()), PosTag::X);
    }

    #[test]
    fn test_model_location_order() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Path::new("/models/cli.bin");

        assert_eq!(
            ModelLocation::locate(Some(cli), Some("/models/env.bin".into()), Some(dir.path().into())),
            ModelLocation::Explicit(cli.to_path_buf())
        );
        assert_eq!(
            ModelLocation::locate(None, Some("/models/env.bin".into()), Some(dir.path().into())),
            ModelLocation::Explicit(PathBuf::from("/models/env.bin"))
        );
        // Nothing installed in the data directory yet
        assert_eq!(
            ModelLocation::locate(None, Some(OsString::new()), Some(dir.path().into())),
            ModelLocation::Missing
        );
        assert_eq!(ModelLocation::locate(None, None, None), ModelLocation::Missing);

        let installed = dir.path().join(DATA_SUBDIR).join(TAGGER_MODEL_FILE);
        std::fs::create_dir_all(installed.parent().unwrap()).unwrap();
        std::fs::write(&installed, b"model").unwrap();
        assert_eq!(
            ModelLocation::locate(None, None, Some(dir.path().into())),
            ModelLocation::Default(installed)
        );
    }

    #[test]
    fn test_missing_model_falls_back_to_rule_tagger() {
        let tagger = build_tagger(&ModelLocation::Missing).unwrap();
        assert_eq!(tagger.name(), "rule");
    }

    #[cfg(feature = "nlprule-tagger")]
    #[test]
    fn test_explicit_model_that_fails_to_load_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let location = ModelLocation::Explicit(dir.path().join("absent.bin"));
        assert!(matches!(build_tagger(&location), Err(ExtractError::TaggerInit(_))));
    }

    // Runs only when a tokenizer binary is provided through the environment.
    #[cfg(feature = "nlprule-tagger")]
    #[test]
    fn test_pretrained_model_finds_catalog_brand() {
        let Some(model) = std::env::var_os(TAGGER_MODEL_ENV) else {
            return;
        };
        let tagger = NlpruleTagger::load(Path::new(&model)).unwrap();
        assert_eq!(tagger.name(), "nlprule");

        let brand = tagger
            .tag("Dell Inspiron i5 16GB RAM 512GB SSD $799")
            .into_iter()
            .find(|t| t.tag == PosTag::Propn)
            .map(|t| t.text);
        assert_eq!(brand.as_deref(), Some("Dell"));
    }
}
