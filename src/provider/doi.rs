//! DOI citation lookup through content negotiation at `doi.org`.
//!
//! A [`Doi`] is parsed locally. [`DoiClient`] asks the resolver for a
//! formatted citation, BibTeX, RIS or citeproc JSON by varying the `Accept`
//! header, and [`DoiClient::curated`] flattens the citeproc record into a
//! [`CuratedCitation`].

use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};
use unicode_normalization::UnicodeNormalization;

use crate::http::{HttpClient, Request, ResponseKind};
use crate::link::Url;
use crate::provider::ProviderError;
use crate::validate::{ValidationError, compile_static_regex};

/// DOI resolver.
pub const DOI_BASE_URL: &str = "https://doi.org";

/// Journal title abbreviation service.
pub const ABBREVISO_BASE_URL: &str = "https://abbreviso.toolforge.org";

static DOI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(r"^(?:https?://)?(?:dx\.)?(?:doi\.org/)?(10\.\d+/\S+)")
});
static JATS_PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"(?s)<jats:p>(.*?)</jats:p>"));
static JATS_SUB: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"(?s)<jats:sub>(.*?)</jats:sub>"));

/// Citeproc date fields, most specific first.
const DATE_FIELDS: [&str; 8] = [
    "published",
    "published-online",
    "published-print",
    "published-other",
    "issued",
    "created",
    "deposited",
    "indexed",
];

/// A Digital Object Identifier such as `10.3762/bjoc.17.8`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Doi {
    id: String,
}

impl Doi {
    /// Accepts a bare identifier or a `doi.org` / `dx.doi.org` link, with or
    /// without scheme.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Invalid`] when no `10.<digits>/<suffix>`
    /// identifier is found at the start of the input.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        DOI_PATTERN
            .captures(trimmed)
            .and_then(|caps| caps.get(1))
            .map(|m| Self {
                id: m.as_str().to_string(),
            })
            .ok_or_else(|| {
                ValidationError::pattern(
                    "doi",
                    trimmed,
                    "not a DOI",
                    "Use a form like 10.1234/abcd or https://doi.org/10.1234/abcd",
                )
            })
    }

    /// The identifier without resolver prefix.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// `https://doi.org/{id}`
    ///
    /// # Errors
    ///
    /// Never fails for a parsed DOI; the `Result` comes from URL parsing.
    pub fn url(&self) -> Result<Url, ProviderError> {
        Ok(Url::parse(DOI_BASE_URL)?.join(&self.id))
    }
}

impl fmt::Display for Doi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// BibTeX and RIS renderings of a citation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CitationFormats {
    #[serde(rename = "BibTex")]
    pub bibtex: String,
    #[serde(rename = "RIS")]
    pub ris: String,
}

/// Flattened citation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CuratedCitation {
    pub doi: String,
    pub url: String,
    /// e.g. `journal-article`, `posted-content`
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// e.g. `preprint`
    pub subtype: Option<String>,
    pub cite: CitationFormats,
    pub journal: Option<String>,
    pub journal_abbr: Option<String>,
    pub publisher: Option<String>,
    pub title: Option<String>,
    pub pages: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    /// `(year, month, day)`; missing month or day default to 1.
    pub date_tuple: (i32, u32, u32),
    pub year: i32,
    /// e.g. `8 March 2021`
    pub date: String,
    /// Abstract converted from JATS to HTML.
    #[serde(rename = "abstract")]
    pub abstract_html: Option<String>,
}

/// Client for DOI content negotiation.
#[derive(Debug, Clone)]
pub struct DoiClient {
    http: HttpClient,
    resolver: Url,
    abbreviso: Url,
}

impl DoiClient {
    /// Client against `doi.org` and the public abbreviation service.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Url`] if the built-in endpoints fail to parse.
    pub fn new(http: HttpClient) -> Result<Self, ProviderError> {
        Ok(Self::with_endpoints(
            http,
            Url::parse(DOI_BASE_URL)?,
            Url::parse(ABBREVISO_BASE_URL)?,
        ))
    }

    /// Client against custom resolver and abbreviation endpoints.
    #[must_use]
    pub fn with_endpoints(http: HttpClient, resolver: Url, abbreviso: Url) -> Self {
        Self {
            http,
            resolver,
            abbreviso,
        }
    }

    fn negotiate(&self, doi: &Doi, accept: &str, expect: ResponseKind) -> Request {
        Request::get(self.resolver.join(doi.id()))
            .header("Accept", accept)
            .encoding("utf-8")
            .expect(expect)
    }

    /// Formatted bibliography entry in a CSL `style` and `locale`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`]; 404 for unknown DOIs.
    #[instrument(skip(self), fields(doi = %doi))]
    pub async fn text(
        &self,
        doi: &Doi,
        style: Option<&str>,
        locale: Option<&str>,
    ) -> Result<String, ProviderError> {
        let mut accept = String::from("text/x-bibliography");
        if let Some(style) = style.filter(|s| !s.is_empty()) {
            accept.push_str("; style=");
            accept.push_str(style);
        }
        if let Some(locale) = locale.filter(|l| !l.is_empty()) {
            accept.push_str("; locale=");
            accept.push_str(locale);
        }
        Ok(self
            .http
            .text(self.negotiate(doi, &accept, ResponseKind::Text))
            .await?)
    }

    /// BibTeX entry.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] on request failure.
    pub async fn bibtex(&self, doi: &Doi) -> Result<String, ProviderError> {
        Ok(self
            .http
            .text(self.negotiate(doi, "application/x-bibtex", ResponseKind::Text))
            .await?)
    }

    /// RIS record.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] on request failure.
    pub async fn ris(&self, doi: &Doi) -> Result<String, ProviderError> {
        Ok(self
            .http
            .text(self.negotiate(
                doi,
                "application/x-research-info-systems",
                ResponseKind::Text,
            ))
            .await?)
    }

    /// Citeproc JSON record.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] on request or decode failure.
    pub async fn citeproc(&self, doi: &Doi) -> Result<Value, ProviderError> {
        Ok(self
            .http
            .json(self.negotiate(doi, "application/citeproc+json", ResponseKind::Json))
            .await?)
    }

    /// Abbreviated journal title, title-cased.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] on request failure.
    pub async fn journal_abbreviation(&self, journal: &str) -> Result<String, ProviderError> {
        let url = self.abbreviso.append_path(["abbreviso", "a", journal]);
        let abbreviation = self.http.text(Request::get(url)).await?;
        Ok(title_case(abbreviation.trim()))
    }

    /// Citeproc record plus BibTeX and RIS, flattened.
    ///
    /// The journal abbreviation comes from `container-title-short` or, when
    /// absent, from the abbreviation service.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::UnexpectedPayload`] when the record has no
    /// usable date, or any error from the underlying lookups.
    #[instrument(skip(self), fields(doi = %doi))]
    pub async fn curated(&self, doi: &Doi) -> Result<CuratedCitation, ProviderError> {
        let data = self.citeproc(doi).await?;
        let journal = field_text(&data, "container-title");
        let journal_abbr = match (&journal, field_text(&data, "container-title-short")) {
            (None, _) => None,
            (Some(_), Some(short)) => Some(short),
            (Some(journal), None) => {
                debug!(journal, "looking up journal abbreviation");
                Some(self.journal_abbreviation(journal).await?)
            }
        };
        let date_tuple = citation_date(&data).ok_or_else(|| {
            ProviderError::unexpected("citeproc", "record has no publication date")
        })?;
        let date = format_date(date_tuple).ok_or_else(|| {
            ProviderError::unexpected("citeproc", format!("invalid date {date_tuple:?}"))
        })?;

        Ok(CuratedCitation {
            doi: doi.id().to_string(),
            url: doi.url()?.to_string(),
            kind: field_text(&data, "type"),
            subtype: field_text(&data, "subtype"),
            cite: CitationFormats {
                bibtex: self.bibtex(doi).await?,
                ris: self.ris(doi).await?,
            },
            journal,
            journal_abbr,
            publisher: field_text(&data, "publisher"),
            title: field_text(&data, "title"),
            pages: field_text(&data, "page"),
            volume: field_text(&data, "volume"),
            issue: field_text(&data, "issue"),
            date_tuple,
            year: date_tuple.0,
            date,
            abstract_html: field_text(&data, "abstract").map(|a| jats_to_html(&a)),
        })
    }
}

/// Converts a JATS abstract to HTML.
///
/// The text is NFKC-normalized, reduced to its first `<jats:p>` paragraph
/// when there is one, and `<jats:sub>` becomes `<sub>`.
#[must_use]
pub fn jats_to_html(jats: &str) -> String {
    let normalized: String = jats.nfkc().collect();
    let paragraph = JATS_PARAGRAPH
        .captures(&normalized)
        .and_then(|caps| caps.get(1))
        .map_or(normalized.as_str(), |m| m.as_str());
    JATS_SUB
        .replace_all(paragraph, "<sub>$1</sub>")
        .into_owned()
}

/// Text of a citeproc field; arrays yield their first element, numbers
/// their decimal form, and empty strings count as absent.
fn field_text(data: &Value, key: &str) -> Option<String> {
    fn text(value: &Value) -> Option<String> {
        match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Array(items) => items.first().and_then(text),
            _ => None,
        }
    }
    data.get(key).and_then(text)
}

/// Year from the first field carrying one; month and day from the first
/// field carrying a month, defaulting to 1.
fn citation_date(data: &Value) -> Option<(i32, u32, u32)> {
    let mut year: Option<i32> = None;
    let mut month: Option<u32> = None;
    let mut day: Option<u32> = None;
    for field in DATE_FIELDS {
        if year.is_some() && month.is_some() && day.is_some() {
            break;
        }
        let Some(parts) = data
            .get(field)
            .and_then(|f| f.get("date-parts"))
            .and_then(|p| p.get(0))
            .and_then(Value::as_array)
            .filter(|p| !p.is_empty())
        else {
            continue;
        };
        let part = |i: usize| parts.get(i).and_then(Value::as_i64);
        if year.is_none() {
            year = part(0).and_then(|y| i32::try_from(y).ok());
        }
        if month.is_none() && parts.len() >= 2 {
            month = part(1).and_then(|m| u32::try_from(m).ok());
            if parts.len() >= 3 {
                day = part(2).and_then(|d| u32::try_from(d).ok());
            }
        }
    }
    Some((year?, month.unwrap_or(1), day.unwrap_or(1)))
}

fn format_date((year, month, day): (i32, u32, u32)) -> Option<String> {
    NaiveDate::from_ymd_opt(year, month, day).map(|d| d.format("%-d %B %Y").to_string())
}

/// Uppercases the first letter of each word and lowercases the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_forms() {
        for input in [
            "10.3762/bjoc.17.8",
            "https://doi.org/10.3762/bjoc.17.8",
            "http://dx.doi.org/10.3762/bjoc.17.8",
            "dx.doi.org/10.3762/bjoc.17.8",
            "  doi.org/10.3762/bjoc.17.8 ",
        ] {
            assert_eq!(Doi::parse(input).unwrap().id(), "10.3762/bjoc.17.8", "{input}");
        }
    }

    #[test]
    fn test_parse_rejects_non_doi() {
        assert!(Doi::parse("11.1234/x").is_err());
        assert!(Doi::parse("https://example.com/10.1/x").is_err());
        assert!(Doi::parse("").is_err());
    }

    #[test]
    fn test_doi_url() {
        let doi = Doi::parse("10.1039/d2sc03130b").unwrap();
        assert_eq!(doi.url().unwrap().to_string(), "https://doi.org/10.1039/d2sc03130b");
    }

    #[test]
    fn test_jats_to_html() {
        let jats = "<jats:title>Abstract</jats:title><jats:p>CO<jats:sub>2</jats:sub> \u{FB01}xation</jats:p>";
        assert_eq!(jats_to_html(jats), "CO<sub>2</sub> fixation");
        assert_eq!(jats_to_html("plain"), "plain");
    }

    #[test]
    fn test_citation_date_prefers_first_complete_field() {
        let data = json!({
            "published-online": {"date-parts": [[2021, 3]]},
            "issued": {"date-parts": [[2020, 1, 15]]},
        });
        assert_eq!(citation_date(&data), Some((2021, 3, 1)));

        let data = json!({
            "published-print": {"date-parts": [[2019]]},
            "created": {"date-parts": [[2018, 7, 9]]},
        });
        assert_eq!(citation_date(&data), Some((2019, 7, 9)));

        assert_eq!(citation_date(&json!({})), None);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date((2021, 3, 8)).unwrap(), "8 March 2021");
        assert!(format_date((2021, 13, 1)).is_none());
    }

    #[test]
    fn test_field_text_shapes() {
        let data = json!({"title": ["First", "Second"], "volume": 17, "issue": "", "page": "1-10"});
        assert_eq!(field_text(&data, "title").as_deref(), Some("First"));
        assert_eq!(field_text(&data, "volume").as_deref(), Some("17"));
        assert_eq!(field_text(&data, "issue"), None);
        assert_eq!(field_text(&data, "page").as_deref(), Some("1-10"));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("beilstein j. org. chem."), "Beilstein J. Org. Chem.");
        assert_eq!(title_case("NATURE"), "Nature");
    }
}
