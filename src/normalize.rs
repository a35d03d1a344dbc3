//! The normalisation pipeline.
//!
//! Pure text→text rewrites applied in a fixed order by the parsing jobs
//! before the top-level pattern runs. Extraction steps return the shrunken
//! remainder together with what was cut out; the job owns attaching warnings
//! and filling `ParsedName` fields.

use unicode_normalization::UnicodeNormalization;

use crate::atoms::NAME_UPPER;

/// Result of [`pre_clean`]: the cleaned text plus which warnings apply.
#[derive(Debug, Clone)]
pub(crate) struct PreClean {
    pub text: String,
    pub html_entities: bool,
    pub xml_tags: bool,
    pub enclosing_quotes: bool,
}

/// First pass over the raw input: Unicode NFC, control characters, HTML
/// entities, XML tags and enclosing quotes.
pub(crate) fn pre_clean(raw: &str) -> PreClean {
    let mut text: String = raw
        .nfc()
        .map(|c| match c {
            '\u{00a0}' => ' ',
            c if c.is_control() => ' ',
            c => c,
        })
        .filter(|c| !matches!(c, '\u{200b}' | '\u{200c}' | '\u{200d}' | '\u{00ad}' | '\u{feff}'))
        .collect();

    let mut html_entities = false;
    if let Some(unescaped) = unescape_entities(&text) {
        text = unescaped;
        html_entities = true;
    }

    let mut xml_tags = false;
    let tag_re = regex!(r"</?[A-Za-z][^<>]*>");
    if tag_re.is_match(&text) {
        text = tag_re.replace_all(&text, "").into_owned();
        xml_tags = true;
    }

    text = text.trim().to_string();

    let mut enclosing_quotes = false;
    loop {
        let stripped = strip_enclosing_quotes(&text);
        match stripped {
            Some(inner) => {
                text = inner;
                enclosing_quotes = true;
            }
            None => break,
        }
    }

    PreClean { text, html_entities, xml_tags, enclosing_quotes }
}

fn strip_enclosing_quotes(text: &str) -> Option<String> {
    const PAIRS: &[(char, char)] = &[('"', '"'), ('“', '”'), ('«', '»'), ('\'', '\'')];
    let mut chars = text.chars();
    let first = chars.next()?;
    let last = text.chars().last()?;
    for (open, close) in PAIRS {
        if first == *open && last == *close && text.chars().count() > 2 {
            let inner: String = text[first.len_utf8()..text.len() - last.len_utf8()].trim().to_string();
            return Some(inner);
        }
    }
    None
}

fn named_entity(name: &str) -> Option<char> {
    Some(match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "times" => '×',
        "auml" => 'ä',
        "ouml" => 'ö',
        "uuml" => 'ü',
        "Auml" => 'Ä',
        "Ouml" => 'Ö',
        "Uuml" => 'Ü',
        "aacute" => 'á',
        "agrave" => 'à',
        "eacute" => 'é',
        "egrave" => 'è',
        "iacute" => 'í',
        "oacute" => 'ó',
        "uacute" => 'ú',
        "ccedil" => 'ç',
        "ntilde" => 'ñ',
        "oslash" => 'ø',
        "aring" => 'å',
        "aelig" => 'æ',
        "oelig" => 'œ',
        "szlig" => 'ß',
        _ => return None,
    })
}

fn unescape_entities(text: &str) -> Option<String> {
    if !text.contains('&') {
        return None;
    }
    let re = regex!(r"&(#[xX]?[0-9a-fA-F]+|[a-zA-Z]+);");
    let mut changed = false;
    let out = re.replace_all(text, |caps: &regex::Captures| {
        let entity = &caps[1];
        let replacement = if let Some(hex) =
            entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X"))
        {
            u32::from_str_radix(hex, 16).ok().and_then(char::from_u32).map(String::from)
        } else if let Some(dec) = entity.strip_prefix('#') {
            dec.parse::<u32>().ok().and_then(char::from_u32).map(String::from)
        } else {
            named_entity(entity).map(String::from)
        };
        match replacement {
            Some(r) => {
                changed = true;
                r
            }
            None => caps[0].to_string(),
        }
    });
    if changed { Some(out.into_owned()) } else { None }
}

/// Strip a leading `Candidatus`/`Ca.` bacterial prefix.
pub(crate) fn strip_candidatus(name: &str) -> Option<String> {
    let re = regex!(r"^(?i)(?:candidatus|ca\.) ");
    if re.is_match(name) {
        Some(re.replace(name, "").into_owned())
    } else {
        None
    }
}

/// Detect and excise a bibliographic in-reference with volume or year, e.g.
/// `in Jones, Flora 12:3. 1880`. Returns `(rest, reference)`.
pub(crate) fn preparse_nom_ref(name: &str) -> Option<(String, String)> {
    let re = regex!(format!("[,;]? ?\\bin ((?:[{NAME_UPPER}]|[0-9]).*[0-9].*)$"));
    let caps = re.captures(name)?;
    let reference = caps.get(1).unwrap().as_str().trim().to_string();
    let rest = name[..caps.get(0).unwrap().start()].trim().to_string();
    Some((rest, reference))
}

/// Residual in-reference forms without digits, applied after status and sec
/// extraction. Returns `(rest, reference)`.
pub(crate) fn extract_published_in(name: &str) -> Option<(String, String)> {
    let re = regex!(format!("[,;]? ?\\bin ([{NAME_UPPER}].+)$"));
    let caps = re.captures(name)?;
    let reference = caps.get(1).unwrap().as_str().trim().to_string();
    let rest = name[..caps.get(0).unwrap().start()].trim().to_string();
    Some((rest, reference))
}

/// Strip `auct.` (optionally `auct. non Xyz`) and a terminal `hort.`
/// placeholder author. Returns the cleaned string when something was removed.
pub(crate) fn remove_placeholder_author(name: &str) -> Option<String> {
    let auct = regex!(r"[,;]? ?\bauct(?:orum)?\b\.?(?: ?non [A-Z][a-zA-Z.]*)?");
    let hort = regex!(r"[,;]? ?\bhort\.?$");
    let mut out = name.to_string();
    let mut changed = false;
    if auct.is_match(&out) {
        out = auct.replace_all(&out, "").into_owned();
        changed = true;
    }
    if hort.is_match(&out) {
        out = hort.replace(&out, "").into_owned();
        changed = true;
    }
    if changed { Some(out.trim().to_string()) } else { None }
}

/// The main normalisation rewrite: canonical apostrophes and hyphens, hybrid
/// sign unification, author join unification, initials spacing, whitespace.
pub(crate) fn normalize(name: &str) -> String {
    let mut out = name.to_string();

    out = regex!(r"[’‘´`]").replace_all(&out, "'").into_owned();
    out = regex!(r"[–—‑]").replace_all(&out, "-").into_owned();

    // Lone x/X tokens are hybrid signs.
    out = regex!(r"^[xX×] +").replace(&out, "× ").into_owned();
    out = regex!(r" [xX] ").replace_all(&out, " × ").into_owned();

    // Author joins become ampersands; `al.` tails are rendered back as `et al.`
    out = regex!(r" (?:and|et|und) ").replace_all(&out, " & ").into_owned();

    // `ex.` is written `ex` in authorships.
    out = regex!(r"\bex\. ").replace_all(&out, "ex ").into_owned();

    out = regex!(r"\s+").replace_all(&out, " ").into_owned();

    // Glue single-letter initials to the following name part: `H. Karst.` ->
    // `H.Karst.`; run to fixpoint for chains of initials.
    let initials = regex!(format!("\\b([{NAME_UPPER}])\\. ([{NAME_UPPER}])"));
    loop {
        let next = initials.replace_all(&out, "$1.$2").into_owned();
        if next == out {
            break;
        }
        out = next;
    }

    out = regex!(r" ([,;)])").replace_all(&out, "$1").into_owned();
    out = regex!(r"\( ").replace_all(&out, "(").into_owned();

    out.trim().to_string()
}

/// Build the nomenclatural status extraction pattern from the vocabulary.
fn nom_status_pattern() -> String {
    let stems = crate::vocab::NOM_STATUS_STEMS.join("|");
    format!(
        "[,;]? ?\\(?\\b((?:nom(?:en)?|comb|gen|sp(?:ec)?|stat)\\.? ?(?:utique ?)?(?:{stems})\\b\\.?(?: ?prop\\.?)?|ined\\.?|in press|unpublished)\\)?"
    )
}

/// Extract one nomenclatural status phrase. Returns `(rest, note)`.
pub(crate) fn extract_nom_status(name: &str) -> Option<(String, String)> {
    let re = regex!(nom_status_pattern());
    let caps = re.captures(name)?;
    let note = caps.get(1).unwrap().as_str().trim().to_string();
    let m = caps.get(0).unwrap();
    let mut rest = String::with_capacity(name.len());
    rest.push_str(&name[..m.start()]);
    rest.push(' ');
    rest.push_str(&name[m.end()..]);
    Some((rest.trim().to_string(), note))
}

/// Extract a sec/sensu concept reference. Returns `(rest, note)`.
pub(crate) fn extract_sec_reference(name: &str) -> Option<(String, String)> {
    let re = regex!(
        r"[,;]? ?\b(s\.\s?l\.|s\.\s?str\.|s\.\s?lat\.|sensu (?:lato|stricto|latu)\b|sensu .+|sec\. .+|sec .+)$"
    );
    let caps = re.captures(name)?;
    let note = caps.get(1).unwrap().as_str().trim().to_string();
    let rest = name[..caps.get(0).unwrap().start()].trim().to_string();
    Some((rest, note))
}

/// Fix the casing of gardeners' `hort. ex` authors.
pub(crate) fn normalize_hort(name: &str) -> String {
    regex!(r"\b(?i)hort\. ?ex\b\.? ?").replace_all(name, "hort. ex ").into_owned()
}

/// Remove question marks (except a leading placeholder-genus `?`).
/// Returns the cleaned string when any were removed.
pub(crate) fn remove_question_marks(name: &str) -> Option<String> {
    let (head, rest) = if let Some(stripped) = name.strip_prefix('?') {
        ("?", stripped)
    } else {
        ("", name)
    };
    if !rest.contains('?') {
        return None;
    }
    let cleaned: String = rest.chars().filter(|c| *c != '?').collect();
    Some(format!("{head}{}", cleaned.trim_end()))
}

/// Unify all bracket kinds to parentheses.
pub(crate) fn norm_brackets(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '{' | '[' => '(',
            '}' | ']' => ')',
            c => c,
        })
        .collect()
}

/// Final whitespace and punctuation cleanup.
pub(crate) fn norm_ws_punct(name: &str) -> String {
    let mut out = regex!(r"\.{2,}").replace_all(name, ".").into_owned();
    out = regex!(r"\s+").replace_all(&out, " ").into_owned();
    out = regex!(r"\(\s*\)").replace_all(&out, "").into_owned();
    out = regex!(r" ([,;)])").replace_all(&out, "$1").into_owned();
    out.trim().trim_matches(|c| matches!(c, ',' | ';' | ':')).trim().to_string()
}

/// Replace characters that never occur in a scientific name with spaces.
/// Returns the cleaned string when any were found.
pub(crate) fn strip_unusual_characters(name: &str) -> Option<String> {
    let re = regex!(r#"[^\p{L}\p{N} ()\[\].,&:×?'"/-]"#);
    if re.is_match(name) {
        Some(regex!(r"\s+").replace_all(re.replace_all(name, " ").as_ref(), " ").trim().to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pre_clean_entities_and_tags() {
        let cleaned = pre_clean("<i>Abies alba</i> Mill.");
        assert_eq!(cleaned.text, "Abies alba Mill.");
        assert!(cleaned.xml_tags);
        assert!(!cleaned.html_entities);

        let cleaned = pre_clean("Abies alba &times; Abies koreana");
        assert_eq!(cleaned.text, "Abies alba × Abies koreana");
        assert!(cleaned.html_entities);

        let cleaned = pre_clean("\"Abies alba\"");
        assert_eq!(cleaned.text, "Abies alba");
        assert!(cleaned.enclosing_quotes);
    }

    #[test]
    fn candidatus_prefix() {
        assert_eq!(
            strip_candidatus("Candidatus Liberibacter asiaticus").as_deref(),
            Some("Liberibacter asiaticus")
        );
        assert_eq!(strip_candidatus("Ca. Phytoplasma").as_deref(), Some("Phytoplasma"));
        assert!(strip_candidatus("Abies alba").is_none());
    }

    #[test]
    fn nom_ref_extraction() {
        let (rest, reference) = preparse_nom_ref("Abies alba Mill. in Jones, Flora 12:3. 1880").unwrap();
        assert_eq!(rest, "Abies alba Mill.");
        assert_eq!(reference, "Jones, Flora 12:3. 1880");

        assert!(preparse_nom_ref("Abies alba Mill.").is_none());
    }

    #[test]
    fn normalize_hybrid_and_joins() {
        assert_eq!(normalize("Abies alba x Abies koreana"), "Abies alba × Abies koreana");
        assert_eq!(normalize("x Abies"), "× Abies");
        assert_eq!(normalize("Balf.f. et Forrest"), "Balf.f. & Forrest");
        assert_eq!(normalize("Picea abies (L.) H. Karst."), "Picea abies (L.) H.Karst.");
    }

    #[test]
    fn nom_status() {
        let (rest, note) = extract_nom_status("Abies alba Mill. nom. illeg.").unwrap();
        assert_eq!(rest, "Abies alba Mill.");
        assert_eq!(note, "nom. illeg.");

        let (rest, note) = extract_nom_status("Linaria vulgaris comb. nov.").unwrap();
        assert_eq!(rest, "Linaria vulgaris");
        assert_eq!(note, "comb. nov.");

        assert!(extract_nom_status("Abies alba Mill.").is_none());
    }

    #[test]
    fn sec_reference() {
        let (rest, note) = extract_sec_reference("Achillea millefolium sensu Greuter 2006").unwrap();
        assert_eq!(rest, "Achillea millefolium");
        assert_eq!(note, "sensu Greuter 2006");

        let (rest, note) = extract_sec_reference("Achillea millefolium s.l.").unwrap();
        assert_eq!(rest, "Achillea millefolium");
        assert_eq!(note, "s.l.");
    }

    #[test]
    fn question_marks() {
        assert_eq!(remove_question_marks("Abies alba?").as_deref(), Some("Abies alba"));
        assert!(remove_question_marks("? alba").is_none());
        assert!(remove_question_marks("Abies alba").is_none());
    }

    #[test]
    fn brackets_and_punct() {
        assert_eq!(norm_brackets("Picea abies [L.] Karst."), "Picea abies (L.) Karst.");
        assert_eq!(norm_ws_punct("Abies  alba ,"), "Abies alba");
        assert_eq!(norm_ws_punct("Abies alba ()"), "Abies alba");
    }

    #[test]
    fn placeholder_authors() {
        assert_eq!(remove_placeholder_author("Abies alba auct. non Mill.").as_deref(), Some("Abies alba"));
        assert_eq!(remove_placeholder_author("Anemone hort.").as_deref(), Some("Anemone"));
        assert!(remove_placeholder_author("Abies alba Mill.").is_none());
    }

    #[test]
    fn unusual_characters() {
        assert_eq!(strip_unusual_characters("Abies #alba").as_deref(), Some("Abies alba"));
        assert!(strip_unusual_characters("Abies alba").is_none());
    }
}
