//! Static font-metric tables for the PDF standard-14 text faces used by the exporter.
//!
//! Widths are the AFM advance widths in thousandths of an em, so a string's width in
//! points is `sum(widths) / 1000 × font_size`. There is no kerning: the width of a
//! string is exactly the sum of its characters, which keeps greedy wrapping stable
//! (re-measuring a wrapped line gives the same number the wrapper saw).
//!
//! All tables cover ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32. A handful of WinAnsi extras (bullet, dashes, curly
//! quotes, ellipsis, euro) carry explicit widths; everything else falls back to the
//! table's average width.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Font family / style
// ────────────────────────────────────────────────────────────────────────────

/// Base-14 families the PDF backend can reference without embedding a font file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    /// Times-Roman / Times-Bold / Times-Italic. Default for both document kinds.
    Times,
    /// Helvetica / Helvetica-Bold / Helvetica-Oblique.
    Helvetica,
}

impl FromStr for FontFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "times" | "times-roman" | "serif" => Ok(FontFamily::Times),
            "helvetica" | "sans" | "sans-serif" => Ok(FontFamily::Helvetica),
            other => Err(format!("unknown font family '{other}' (expected times or helvetica)")),
        }
    }
}

/// Weight/slant of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

impl FontStyle {
    pub const ALL: [FontStyle; 3] = [FontStyle::Regular, FontStyle::Bold, FontStyle::Italic];
}

/// PostScript name of the base-14 face for a family/style pair.
pub fn base_font_name(family: FontFamily, style: FontStyle) -> &'static str {
    match (family, style) {
        (FontFamily::Times, FontStyle::Regular) => "Times-Roman",
        (FontFamily::Times, FontStyle::Bold) => "Times-Bold",
        (FontFamily::Times, FontStyle::Italic) => "Times-Italic",
        (FontFamily::Helvetica, FontStyle::Regular) => "Helvetica",
        (FontFamily::Helvetica, FontStyle::Bold) => "Helvetica-Bold",
        (FontFamily::Helvetica, FontStyle::Italic) => "Helvetica-Oblique",
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Text measurer seam
// ────────────────────────────────────────────────────────────────────────────

/// Width measurement and line wrapping, independent of any drawing surface.
///
/// Only `measure_width` is required; `wrap` is the greedy word-wrap every block
/// renderer relies on and is written purely in terms of `measure_width`.
pub trait TextMeasurer: Send + Sync {
    /// Width of `text` in points at `font_size`.
    fn measure_width(&self, text: &str, font_size: f32, style: FontStyle) -> f32;

    /// Greedy word wrap.
    ///
    /// A word joins the current line only when the joined line, measured as a whole,
    /// stays within `max_width`. A word that is wider than `max_width` on its own gets
    /// a line to itself (no hyphenation). Empty or whitespace-only input yields no lines.
    fn wrap(&self, text: &str, max_width: f32, font_size: f32, style: FontStyle) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{current} {word}");
            if self.measure_width(&candidate, font_size, style) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

/// The default measurer: built-in AFM tables for one base-14 family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardFonts {
    pub family: FontFamily,
}

impl StandardFonts {
    pub fn new(family: FontFamily) -> Self {
        Self { family }
    }
}

impl TextMeasurer for StandardFonts {
    fn measure_width(&self, text: &str, font_size: f32, style: FontStyle) -> f32 {
        get_metrics(self.family, style).measure_str(text) * font_size
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for one face.
///
/// `widths[i]` = width of ASCII character `(i + 32)` in 1/1000 em.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    widths: [u16; 95],
    /// Non-ASCII characters the WinAnsi encoding can represent, with their widths.
    extended: &'static [(char, u16)],
    /// Fallback width for characters in neither table.
    pub average_char_width: u16,
}

impl FontMetricTable {
    /// Width of one character in 1/1000 em.
    pub fn char_units(&self, c: char) -> u16 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            return self.widths[code - 32];
        }
        self.extended
            .iter()
            .find(|(ch, _)| *ch == c)
            .map(|(_, w)| *w)
            .unwrap_or(self.average_char_width)
    }

    /// Rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        let units: u32 = s.chars().map(|c| u32::from(self.char_units(c))).sum();
        units as f32 / 1000.0
    }
}

/// Returns the static metric table for a family/style pair.
pub fn get_metrics(family: FontFamily, style: FontStyle) -> &'static FontMetricTable {
    match (family, style) {
        (FontFamily::Times, FontStyle::Regular) => &TIMES_ROMAN_TABLE,
        (FontFamily::Times, FontStyle::Bold) => &TIMES_BOLD_TABLE,
        (FontFamily::Times, FontStyle::Italic) => &TIMES_ITALIC_TABLE,
        // Helvetica-Oblique is a slanted Helvetica with identical advances.
        (FontFamily::Helvetica, FontStyle::Regular | FontStyle::Italic) => &HELVETICA_TABLE,
        (FontFamily::Helvetica, FontStyle::Bold) => &HELVETICA_BOLD_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static TIMES_ROMAN_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
        // 0    1    2    3    4    5    6    7    8    9
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
        // :    ;    <    =    >    ?    @
        278, 278, 564, 564, 564, 444, 921,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611,
        // [    \    ]    ^    _    `
        333, 278, 333, 469, 500, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444,
        // {    |    }    ~
        480, 200, 480, 541,
    ],
    extended: &[
        ('•', 350), ('–', 500), ('—', 1000), ('‘', 333), ('’', 333),
        ('“', 444), ('”', 444), ('…', 1000), ('€', 500),
    ],
    average_char_width: 450,
};

static TIMES_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %     &    '    (    )    *    +    ,    -    .    /
        250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
        // 0    1    2    3    4    5    6    7    8    9
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
        // :    ;    <    =    >    ?    @
        333, 333, 570, 570, 570, 500, 930,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944,
        // N    O    P    Q    R    S    T    U    V    W     X    Y    Z
        722, 778, 611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667,
        // [    \    ]    ^    _    `
        333, 278, 333, 581, 500, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        556, 500, 556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444,
        // {    |    }    ~
        394, 220, 394, 520,
    ],
    extended: &[
        ('•', 350), ('–', 500), ('—', 1000), ('‘', 333), ('’', 333),
        ('“', 500), ('”', 500), ('…', 1000), ('€', 500),
    ],
    average_char_width: 480,
};

static TIMES_ITALIC_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333, 250, 278,
        // 0    1    2    3    4    5    6    7    8    9
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
        // :    ;    <    =    >    ?    @
        333, 333, 675, 675, 675, 500, 920,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        611, 611, 667, 722, 611, 611, 722, 722, 333, 444, 667, 556, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        667, 722, 611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556,
        // [    \    ]    ^    _    `
        389, 278, 389, 422, 500, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        500, 500, 444, 500, 444, 278, 500, 500, 278, 278, 444, 278, 722,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        500, 500, 500, 500, 389, 389, 278, 500, 444, 667, 444, 444, 389,
        // {    |    }    ~
        400, 275, 400, 541,
    ],
    extended: &[
        ('•', 350), ('–', 500), ('—', 889), ('‘', 333), ('’', 333),
        ('“', 556), ('”', 556), ('…', 889), ('€', 500),
    ],
    average_char_width: 440,
};

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        278, 278, 584, 584, 584, 556, 1015,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        278, 278, 278, 469, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        // {    |    }    ~
        334, 260, 334, 584,
    ],
    extended: &[
        ('•', 350), ('–', 556), ('—', 1000), ('‘', 222), ('’', 222),
        ('“', 333), ('”', 333), ('…', 1000), ('€', 556),
    ],
    average_char_width: 520,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        333, 333, 584, 584, 584, 611, 975,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        333, 278, 333, 584, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        // {    |    }    ~
        389, 280, 389, 584,
    ],
    extended: &[
        ('•', 350), ('–', 556), ('—', 1000), ('‘', 278), ('’', 278),
        ('“', 500), ('”', 500), ('…', 1000), ('€', 556),
    ],
    average_char_width: 560,
};

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn times() -> StandardFonts {
        StandardFonts::new(FontFamily::Times)
    }

    // ── tables ──────────────────────────────────────────────────────────────

    #[test]
    fn test_space_width_times_roman() {
        let metrics = get_metrics(FontFamily::Times, FontStyle::Regular);
        assert_eq!(metrics.char_units(' '), 250);
        assert!((metrics.measure_str(" ") - 0.25).abs() < EPS);
    }

    #[test]
    fn test_measure_empty_is_zero() {
        assert_eq!(times().measure_width("", 11.0, FontStyle::Regular), 0.0);
    }

    #[test]
    fn test_bold_wider_than_regular() {
        let text = "Professional Experience";
        let m = times();
        assert!(
            m.measure_width(text, 11.0, FontStyle::Bold)
                > m.measure_width(text, 11.0, FontStyle::Regular)
        );
    }

    #[test]
    fn test_width_scales_with_font_size() {
        let m = times();
        let w10 = m.measure_width("Resume", 10.0, FontStyle::Regular);
        let w20 = m.measure_width("Resume", 20.0, FontStyle::Regular);
        assert!((w20 - 2.0 * w10).abs() < EPS);
    }

    #[test]
    fn test_bullet_glyph_has_explicit_width() {
        let metrics = get_metrics(FontFamily::Times, FontStyle::Regular);
        assert_eq!(metrics.char_units('•'), 350);
        // Unmapped non-ASCII falls back to the average width.
        assert_eq!(metrics.char_units('漢'), metrics.average_char_width);
    }

    #[test]
    fn test_helvetica_oblique_shares_regular_widths() {
        let m = StandardFonts::new(FontFamily::Helvetica);
        let text = "github.com/user";
        assert_eq!(
            m.measure_width(text, 10.0, FontStyle::Italic),
            m.measure_width(text, 10.0, FontStyle::Regular)
        );
    }

    #[test]
    fn test_base_font_names() {
        assert_eq!(base_font_name(FontFamily::Times, FontStyle::Bold), "Times-Bold");
        assert_eq!(
            base_font_name(FontFamily::Helvetica, FontStyle::Italic),
            "Helvetica-Oblique"
        );
        assert_eq!(base_font_name(FontFamily::Times, FontStyle::Regular), "Times-Roman");
    }

    #[test]
    fn test_font_family_from_str() {
        assert_eq!("Times".parse::<FontFamily>(), Ok(FontFamily::Times));
        assert_eq!(" helvetica ".parse::<FontFamily>(), Ok(FontFamily::Helvetica));
        assert!("comic-sans".parse::<FontFamily>().is_err());
    }

    // ── wrap ────────────────────────────────────────────────────────────────

    #[test]
    fn test_wrap_empty_and_whitespace_yield_no_lines() {
        let m = times();
        assert!(m.wrap("", 100.0, 11.0, FontStyle::Regular).is_empty());
        assert!(m.wrap("   \n\t  ", 100.0, 11.0, FontStyle::Regular).is_empty());
    }

    #[test]
    fn test_wrap_short_text_is_single_line() {
        let lines = times().wrap("Built a compiler", 400.0, 11.0, FontStyle::Regular);
        assert_eq!(lines, vec!["Built a compiler".to_string()]);
    }

    #[test]
    fn test_wrap_lines_fit_max_width() {
        let m = times();
        let text = "Engineered an automated transaction monitoring platform for real-time \
                    anomaly detection and operational transparency using Python, SQL, and Docker.";
        let max = 200.0;
        let lines = m.wrap(text, max, 11.0, FontStyle::Regular);
        assert!(lines.len() > 1);
        for line in &lines {
            let w = m.measure_width(line, 11.0, FontStyle::Regular);
            assert!(w <= max, "line '{line}' is {w}pt, max {max}pt");
        }
    }

    #[test]
    fn test_wrap_fits_when_max_width_is_an_exact_line_width() {
        // The limit equals the measured width of a real prefix, so any drift between
        // the fit decision and the final measurement would overshoot it.
        let m = times();
        let words = ["Wq", "a", "lopdf", "renderer", "with", "fi", "WAVY", "kerning", "iii", "M"];
        let text = words.join(" ");
        for tenths in 97..=131 {
            let size = tenths as f32 / 10.0;
            for style in FontStyle::ALL {
                for k in 1..=words.len() {
                    let max = m.measure_width(&words[..k].join(" "), size, style);
                    for line in m.wrap(&text, max, size, style) {
                        let w = m.measure_width(&line, size, style);
                        assert!(
                            w <= max || !line.contains(' '),
                            "size {size}: line '{line}' is {w}pt, max {max}pt"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_wrap_rejoin_reproduces_normalized_input() {
        let m = times();
        let text = "  Led   development of a gRPC testing interface\nand intelligent API \
                    autocompletion,   improving developer speed by 30%.  ";
        let lines = m.wrap(text, 120.0, 11.0, FontStyle::Regular);
        let normalized: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(lines.join(" "), normalized.join(" "));
    }

    #[test]
    fn test_wrap_overlong_word_gets_its_own_line() {
        let m = times();
        let long_word = "Supercalifragilisticexpialidocious-microservice-orchestrator";
        let text = format!("a {long_word} b");
        let max = 60.0;
        assert!(m.measure_width(long_word, 11.0, FontStyle::Regular) > max);

        let lines = m.wrap(&text, max, 11.0, FontStyle::Regular);
        assert_eq!(lines, vec!["a".to_string(), long_word.to_string(), "b".to_string()]);
    }

    #[test]
    fn test_wrap_is_greedy() {
        // Each line could not have taken the next line's first word.
        let m = times();
        let text = "word ".repeat(60);
        let max = 150.0;
        let lines = m.wrap(&text, max, 11.0, FontStyle::Regular);
        for pair in lines.windows(2) {
            let next_word = pair[1].split(' ').next().unwrap_or_default();
            let extended = format!("{} {}", pair[0], next_word);
            assert!(m.measure_width(&extended, 11.0, FontStyle::Regular) > max);
        }
    }
}
