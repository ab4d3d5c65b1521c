//! Symbol tables: Greek names, unicode substitutes and LaTeX macros.

/// `%name` to unicode Greek letter.
const GREEK: &[(&str, &str)] = &[
    ("%alpha", "\u{03B1}"),
    ("%beta", "\u{03B2}"),
    ("%gamma", "\u{03B3}"),
    ("%delta", "\u{03B4}"),
    ("%epsilon", "\u{03B5}"),
    ("%zeta", "\u{03B6}"),
    ("%eta", "\u{03B7}"),
    ("%theta", "\u{03B8}"),
    ("%iota", "\u{03B9}"),
    ("%kappa", "\u{03BA}"),
    ("%lambda", "\u{03BB}"),
    ("%mu", "\u{03BC}"),
    ("%nu", "\u{03BD}"),
    ("%xi", "\u{03BE}"),
    ("%omicron", "\u{03BF}"),
    ("%pi", "\u{03C0}"),
    ("%rho", "\u{03C1}"),
    ("%sigma", "\u{03C3}"),
    ("%tau", "\u{03C4}"),
    ("%upsilon", "\u{03C5}"),
    ("%phi", "\u{03C6}"),
    ("%chi", "\u{03C7}"),
    ("%psi", "\u{03C8}"),
    ("%omega", "\u{03C9}"),
    ("%Alpha", "\u{0391}"),
    ("%Beta", "\u{0392}"),
    ("%Gamma", "\u{0393}"),
    ("%Delta", "\u{0394}"),
    ("%Epsilon", "\u{0395}"),
    ("%Zeta", "\u{0396}"),
    ("%Eta", "\u{0397}"),
    ("%Theta", "\u{0398}"),
    ("%Iota", "\u{0399}"),
    ("%Kappa", "\u{039A}"),
    ("%Lambda", "\u{039B}"),
    ("%Mu", "\u{039C}"),
    ("%Nu", "\u{039D}"),
    ("%Xi", "\u{039E}"),
    ("%Omicron", "\u{039F}"),
    ("%Pi", "\u{03A0}"),
    ("%Rho", "\u{03A1}"),
    ("%Sigma", "\u{03A3}"),
    ("%Tau", "\u{03A4}"),
    ("%Upsilon", "\u{03A5}"),
    ("%Phi", "\u{03A6}"),
    ("%Chi", "\u{03A7}"),
    ("%Psi", "\u{03A8}"),
    ("%Omega", "\u{03A9}"),
];

/// Unicode Greek letter for `text`, with or without the leading `%`.
/// Returns `text` itself when it names no Greek letter.
pub fn greek_unicode(text: &str) -> &str {
    let lookup = |key: &str| GREEK.iter().find(|(k, _)| *k == key).map(|(_, v)| *v);
    let found = if text.starts_with('%') {
        lookup(text)
    } else {
        lookup(&format!("%{text}"))
    };
    found.unwrap_or(text)
}

/// Unicode replacement glyph for operators and special constants.
pub fn symbol_unicode(text: &str, keep_percent: bool) -> Option<&'static str> {
    let symbol = match text {
        "+" => Some("+"),
        "=" => Some("="),
        "inf" => Some("\u{221E}"),
        "%pi" => Some("\u{03C0}"),
        "<=" => Some("\u{2264}"),
        ">=" => Some("\u{2265}"),
        " and " => Some(" \u{22C0} "),
        " or " => Some(" \u{22C1} "),
        " xor " => Some(" \u{22BB} "),
        " nand " => Some(" \u{22BC} "),
        " nor " => Some(" \u{22BD} "),
        " implies " => Some(" \u{21D2} "),
        " equiv " => Some(" \u{21D4} "),
        "not" => Some("\u{00AC}"),
        "->" => Some("\u{2192}"),
        "-->" | " --> " | " \u{2212}\u{2192} " => Some("\u{2794}"),
        _ => None,
    };
    if symbol.is_some() || keep_percent {
        return symbol;
    }
    match text {
        "%e" => Some("e"),
        "%i" => Some("i"),
        _ => None,
    }
}

/// LaTeX for a Greek constant whose text has already been escaped
/// (`%alpha` arrives as `\% alpha`).
pub fn greek_tex(escaped: &str) -> Option<&'static str> {
    let name = escaped.strip_prefix("\\% ")?;
    let tex = match name {
        "alpha" => "\\alpha ",
        "beta" => "\\beta ",
        "gamma" => "\\gamma ",
        "delta" => "\\delta ",
        "epsilon" => "\\epsilon ",
        "zeta" => "\\zeta ",
        "eta" => "\\eta ",
        "theta" => "\\theta ",
        "iota" => "\\iota ",
        "kappa" => "\\kappa ",
        "lambda" => "\\lambda ",
        "mu" => "\\mu ",
        "nu" => "\\nu ",
        "xi" => "\\xi ",
        "omicron" => "\\omicron ",
        "pi" => "\\pi ",
        "rho" => "\\rho ",
        "sigma" => "\\sigma ",
        "tau" => "\\tau ",
        "upsilon" => "\\upsilon ",
        "phi" => "\\phi ",
        "chi" => "\\chi ",
        "psi" => "\\psi ",
        "omega" => "\\omega ",
        "Alpha" => "A",
        "Beta" => "B",
        "Gamma" => "\\Gamma ",
        "Delta" => "\\Delta ",
        "Epsilon" => "\\Epsilon ",
        "Zeta" => "\\Zeta ",
        "Eta" => "\\Eta ",
        "Theta" => "\\Theta ",
        "Iota" => "\\Iota ",
        "Kappa" => "\\Kappa ",
        "Lambda" => "\\Lambda ",
        "Mu" => "\\Mu ",
        "Nu" => "\\Nu ",
        "Xi" => "\\Xi ",
        "Omicron" => "\\Omicron ",
        "Pi" => "\\Pi ",
        "Rho" => "\\Rho ",
        "Sigma" => "\\Sigma ",
        "Tau" => "\\Tau ",
        "Upsilon" => "\\Upsilon ",
        "Phi" => "\\Phi ",
        "Chi" => "\\Chi ",
        "Psi" => "\\Psi ",
        "Omega" => "\\Omega ",
        _ => return None,
    };
    Some(tex)
}

/// One step of the LaTeX substitution chain.
#[derive(Clone, Copy)]
pub enum TexRule {
    /// Replace with a macro, wrapped in the math-mode guard when one is active.
    Guarded(&'static str, &'static str),
    /// Replace verbatim.
    Plain(&'static str, &'static str),
}

/// Applied in order after backslash and brace escaping.
pub const TEX_RULES: &[TexRule] = &[
    TexRule::Guarded("<", "<"),
    TexRule::Guarded(">", ">"),
    TexRule::Plain("\u{2212}", "-"),
    TexRule::Guarded("\u{00B1}", "\\pm"),
    TexRule::Guarded("\u{03B1}", "\\alpha"),
    TexRule::Guarded("\u{00B2}", "^2"),
    TexRule::Guarded("\u{00B3}", "^3"),
    TexRule::Guarded("\u{221A}", "\\sqrt{}"),
    TexRule::Guarded("\u{2148}", "\\mathbbm{i}"),
    TexRule::Guarded("\u{2147}", "\\mathbbm{e}"),
    TexRule::Guarded("\u{210F}", "\\hbar"),
    TexRule::Guarded("\u{2203}", "\\exists"),
    TexRule::Guarded("\u{2204}", "\\nexists"),
    TexRule::Guarded("\u{2208}", "\\in"),
    TexRule::Guarded("\u{21D2}", "\\Longrightarrow"),
    TexRule::Guarded("\u{221E}", "\\infty"),
    TexRule::Guarded("\u{22C0}", "\\wedge"),
    TexRule::Guarded("\u{22C1}", "\\vee"),
    TexRule::Guarded("\u{22BB}", "\\oplus"),
    TexRule::Guarded("\u{22BC}", "\\overline{\\wedge}"),
    TexRule::Guarded("\u{00AC}", "\\setminus"),
    TexRule::Guarded("\u{22C3}", "\\cup"),
    TexRule::Guarded("\u{22C2}", "\\cap"),
    TexRule::Guarded("\u{2286}", "\\subseteq"),
    TexRule::Guarded("\u{2282}", "\\subset"),
    TexRule::Guarded("\u{2288}", "\\not\\subseteq"),
    TexRule::Guarded("\u{0127}", "\\hbar"),
    TexRule::Guarded("\u{0126}", "\\Hbar"),
    TexRule::Guarded("\u{2205}", "\\emptyset"),
    TexRule::Guarded("\u{00BD}", "\\frac{1}{2}"),
    TexRule::Guarded("\u{03B2}", "\\beta"),
    TexRule::Guarded("\u{03B3}", "\\gamma"),
    TexRule::Guarded("\u{03B4}", "\\delta"),
    TexRule::Guarded("\u{03B5}", "\\epsilon"),
    TexRule::Guarded("\u{03B6}", "\\zeta"),
    TexRule::Guarded("\u{03B7}", "\\eta"),
    TexRule::Guarded("\u{03B8}", "\\theta"),
    TexRule::Guarded("\u{03B9}", "\\iota"),
    TexRule::Guarded("\u{03BA}", "\\kappa"),
    TexRule::Guarded("\u{03BB}", "\\lambda"),
    TexRule::Guarded("\u{03BC}", "\\mu"),
    TexRule::Guarded("\u{03BD}", "\\nu"),
    TexRule::Guarded("\u{03BE}", "\\xi"),
    TexRule::Plain("\u{03BF}", "o"),
    TexRule::Guarded("\u{03C0}", "\\pi"),
    TexRule::Guarded("\u{03C1}", "\\rho"),
    TexRule::Guarded("\u{03C3}", "\\sigma"),
    TexRule::Guarded("\u{03C4}", "\\tau"),
    TexRule::Guarded("\u{03C5}", "\\upsilon"),
    TexRule::Guarded("\u{03C6}", "\\phi"),
    TexRule::Guarded("\u{03C7}", "\\chi"),
    TexRule::Guarded("\u{03C8}", "\\psi"),
    TexRule::Guarded("\u{03C9}", "\\omega"),
    TexRule::Plain("\u{0391}", "A"),
    TexRule::Plain("\u{0392}", "B"),
    TexRule::Guarded("\u{0393}", "\\Gamma"),
    TexRule::Guarded("\u{0394}", "\\Delta"),
    TexRule::Plain("\u{0395}", "E"),
    TexRule::Plain("\u{0396}", "Z"),
    TexRule::Plain("\u{0397}", "H"),
    TexRule::Guarded("\u{0398}", "\\Theta"),
    TexRule::Plain("\u{0399}", "I"),
    TexRule::Plain("\u{039A}", "K"),
    TexRule::Guarded("\u{039B}", "\\Lambda"),
    TexRule::Plain("\u{039C}", "M"),
    TexRule::Plain("\u{039D}", "N"),
    TexRule::Guarded("\u{039E}", "\\Xi"),
    TexRule::Plain("\u{039F}", "O"),
    TexRule::Guarded("\u{03A0}", "\\Pi"),
    TexRule::Plain("\u{03A1}", "P"),
    TexRule::Guarded("\u{03A3}", "\\Sigma"),
    TexRule::Plain("\u{03A4}", "T"),
    TexRule::Guarded("\u{03A5}", "\\Upsilon"),
    TexRule::Guarded("\u{03A6}", "\\Phi"),
    TexRule::Plain("\u{03A7}", "X"),
    TexRule::Guarded("\u{03A8}", "\\Psi"),
    TexRule::Guarded("\u{03A9}", "\\Omega"),
    TexRule::Guarded("\u{2202}", "\\partial"),
    TexRule::Guarded("\u{222B}", "\\int"),
    TexRule::Guarded("\u{2245}", "\\approx"),
    TexRule::Guarded("\u{221D}", "\\propto"),
    TexRule::Guarded("\u{2260}", "\\neq"),
    TexRule::Guarded("\u{2264}", "\\leq"),
    TexRule::Guarded("\u{2265}", "\\geq"),
    TexRule::Guarded("\u{226A}", "\\ll"),
    TexRule::Guarded("\u{226B}", "\\gg"),
    TexRule::Guarded("\u{220E}", "\\blacksquare"),
    TexRule::Guarded("\u{2263}", "\\equiv"),
    TexRule::Guarded("\u{2211}", "\\sum"),
    TexRule::Guarded("\u{220F}", "\\prod"),
    TexRule::Guarded("\u{2225}", "\\parallel"),
    TexRule::Guarded("\u{27C2}", "\\bot"),
    TexRule::Guarded("~", "\\sim "),
    TexRule::Plain("_", "\\_ "),
    TexRule::Plain("$", "\\$ "),
    TexRule::Plain("%", "\\% "),
    TexRule::Plain("&", "\\& "),
    TexRule::Guarded("@", "@"),
    TexRule::Guarded("#", "\\neq"),
    TexRule::Plain("\u{00A0}", "~"),
    TexRule::Guarded("<", "<"),
    TexRule::Guarded(">", ">"),
    TexRule::Guarded("\u{219D}", "\\leadsto"),
    TexRule::Guarded("\u{2192}", "\\rightarrow"),
    TexRule::Guarded("\u{2794}", "\\longrightarrow"),
];

/// Run `text` through [`TEX_RULES`] with the given guard pair.
pub fn apply_tex_rules(mut text: String, start: &str, end: &str) -> String {
    for rule in TEX_RULES {
        text = match *rule {
            TexRule::Guarded(from, to) => {
                if text.contains(from) {
                    text.replace(from, &format!("{start}{to}{end}"))
                } else {
                    text
                }
            }
            TexRule::Plain(from, to) => {
                if text.contains(from) {
                    text.replace(from, to)
                } else {
                    text
                }
            }
        };
    }
    text
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_greek_unicode_with_and_without_percent() {
        assert_eq!(greek_unicode("%alpha"), "\u{03B1}");
        assert_eq!(greek_unicode("Omega"), "\u{03A9}");
        assert_eq!(greek_unicode("x"), "x");
        assert_eq!(greek_unicode(""), "");
    }

    #[test]
    fn test_symbol_unicode_keep_percent() {
        assert_eq!(symbol_unicode("%e", false), Some("e"));
        assert_eq!(symbol_unicode("%e", true), None);
        assert_eq!(symbol_unicode("<=", true), Some("\u{2264}"));
        assert_eq!(symbol_unicode("x", false), None);
    }

    #[test]
    fn test_greek_tex() {
        assert_eq!(greek_tex("\\% alpha"), Some("\\alpha "));
        assert_eq!(greek_tex("\\% Beta"), Some("B"));
        assert_eq!(greek_tex("\\% foo"), None);
        assert_eq!(greek_tex("alpha"), None);
    }

    #[test]
    fn test_tex_rules_guarded_and_plain() {
        assert_eq!(apply_tex_rules("a_b".into(), "", " "), "a\\_ b");
        assert_eq!(apply_tex_rules("\u{2264}".into(), "", " "), "\\leq ");
        assert_eq!(
            apply_tex_rules("\u{2264}".into(), "\\ensuremath{", "}"),
            "\\ensuremath{\\leq}"
        );
    }
}
