//! # Syntax highlighting configuration
//!
//! Defines the per-filetype [`Conf`], the compiled-in table of languages, and the highlight class
//! enumeration that every render byte is tagged with.

/// One highlight class. Maps 1:1 to a VT100 SGR color code via [`HlType::color`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HlType {
    Normal,
    Comment,
    MlComment,
    Keyword1,
    Keyword2,
    String,
    Number,
    Match,
}

impl HlType {
    /// The SGR color code used to render bytes tagged with this class.
    pub fn color(self) -> u8 {
        match self {
            Self::Normal => 37,
            Self::Comment | Self::MlComment => 36,
            Self::Keyword1 => 33,
            Self::Keyword2 => 34,
            Self::String => 35,
            Self::Number => 31,
            Self::Match => 34,
        }
    }
}

/// Bit flags selecting optional highlight features for a [`Conf`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HlFlags {
    pub numbers: bool,
    pub strings: bool,
}

/// A keyword entry: the word itself, and whether it belongs to the secondary keyword class
/// (trailing `|` in the compiled-in table).
#[derive(Debug, Clone, Copy)]
pub struct Keyword {
    pub word: &'static str,
    pub secondary: bool,
}

const fn kw(word: &'static str) -> Keyword { Keyword { word, secondary: false } }
const fn kw2(word: &'static str) -> Keyword { Keyword { word, secondary: true } }

/// Syntax definition for one filetype: the pieces needed to recognise the filetype from a file
/// name, and the rules the highlighter (`row::Row::update`) applies to every row.
#[derive(Debug, Clone, Copy)]
pub struct Conf {
    pub name: &'static str,
    /// Patterns matched against the file name. A pattern starting with `.` is matched against the
    /// final extension only; any other pattern is matched as a substring anywhere in the name.
    pub patterns: &'static [&'static str],
    pub keywords: &'static [Keyword],
    pub singleline_comment_start: &'static str,
    pub multiline_comment_start: &'static str,
    pub multiline_comment_end: &'static str,
    pub flags: HlFlags,
}

/// The configuration used when no syntax definition matches a file name: no keywords, no comment
/// delimiters, no number/string highlighting. Kept as a `'static` item (rather than only reachable
/// through `Default::default()`) so callers that need a `&'static Conf` fallback, such as the main
/// editor before any file is opened, don't have to fabricate one.
pub static DEFAULT_CONF: Conf = Conf {
    name: "no ft",
    patterns: &[],
    keywords: &[],
    singleline_comment_start: "",
    multiline_comment_start: "",
    multiline_comment_end: "",
    flags: HlFlags { numbers: false, strings: false },
};

impl Default for Conf {
    fn default() -> Self { DEFAULT_CONF }
}

macro_rules! keywords {
    ($($w:literal),* $(,)? ; $($w2:literal),* $(,)?) => {
        &[$(kw($w)),* , $(kw2($w2)),*]
    };
}

/// The compiled-in table of syntax definitions. Looked up by [`Conf::for_filename`].
pub static HLDB: &[Conf] = &[
    Conf {
        name: "c",
        patterns: &[".c", ".h", ".cpp", ".hpp", ".cc"],
        keywords: keywords!(
            "switch", "if", "while", "for", "break", "continue", "return", "else",
            "struct", "union", "typedef", "static", "enum", "class", "case", "#include", "#define";
            "int", "long", "double", "float", "char", "unsigned", "signed", "void"
        ),
        singleline_comment_start: "//",
        multiline_comment_start: "/*",
        multiline_comment_end: "*/",
        flags: HlFlags { numbers: true, strings: true },
    },
    Conf {
        name: "rust",
        patterns: &[".rs"],
        keywords: keywords!(
            "as", "break", "const", "continue", "crate", "else", "enum", "extern", "fn", "for",
            "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref",
            "return", "self", "Self", "static", "struct", "super", "trait", "unsafe", "use",
            "where", "while", "async", "await", "dyn";
            "bool", "char", "str", "u8", "u16", "u32", "u64", "usize", "i8", "i16", "i32", "i64",
            "isize", "f32", "f64", "String", "Vec", "Option", "Result"
        ),
        singleline_comment_start: "//",
        multiline_comment_start: "/*",
        multiline_comment_end: "*/",
        flags: HlFlags { numbers: true, strings: true },
    },
    Conf {
        name: "python",
        patterns: &[".py"],
        keywords: keywords!(
            "def", "class", "if", "elif", "else", "for", "while", "break", "continue", "return",
            "import", "from", "as", "with", "try", "except", "finally", "raise", "pass", "lambda",
            "yield", "global", "nonlocal", "assert", "del", "is", "in", "not", "and", "or";
            "None", "True", "False", "int", "str", "float", "bool", "list", "dict", "set", "tuple"
        ),
        singleline_comment_start: "#",
        multiline_comment_start: "",
        multiline_comment_end: "",
        flags: HlFlags { numbers: true, strings: true },
    },
];

impl Conf {
    /// Walk [`HLDB`] and return the first entry whose pattern matches `file_name`.
    pub fn for_filename(file_name: &str) -> Option<&'static Conf> {
        HLDB.iter().find(|conf| {
            conf.patterns.iter().any(|pat| {
                if let Some(ext) = pat.strip_prefix('.') {
                    file_name.rsplit('.').next().map_or(false, |e| e == ext)
                } else {
                    file_name.contains(pat)
                }
            })
        })
    }
}

/// Is `b` a separator byte: whitespace, NUL, or one of ``,.()+-/*=~%<>[];` ``.
pub fn is_separator(b: u8) -> bool {
    b.is_ascii_whitespace() || b == 0 || b",.()+-/*=~%<>[];".contains(&b)
}
