//! DOI content negotiation against a mock resolver.

mod support;

use serde_json::json;
use support::socket_guard::start_mock_server_or_skip;
use weblinks::provider::ProviderError;
use weblinks::provider::doi::{Doi, DoiClient};
use weblinks::{HttpClient, LinkConfig, Url};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOI: &str = "10.1000/xyz.1";
const BIBTEX: &str = "@article{Doe_2021, title={Testing}}";
const RIS: &str = "TY  - JOUR\nTI  - Testing\nER  -";

fn client(server: &MockServer) -> DoiClient {
    let http = HttpClient::new(&LinkConfig::default()).unwrap();
    let base = Url::parse(&server.uri()).unwrap();
    DoiClient::with_endpoints(http, base.clone(), base)
}

async fn mount_formats(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/10.1000/xyz.1"))
        .and(header("Accept", "application/x-bibtex"))
        .respond_with(ResponseTemplate::new(200).set_body_string(BIBTEX))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/10.1000/xyz.1"))
        .and(header("Accept", "application/x-research-info-systems"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RIS))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_text_citation_sends_style_and_locale() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/10.1000/xyz.1"))
        .and(header("Accept", "text/x-bibliography; style=apa; locale=en-US"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Doe, J. (2021). Testing.\n"))
        .expect(1)
        .mount(&server)
        .await;

    let doi = Doi::parse(&format!("https://doi.org/{DOI}")).unwrap();
    let text = client(&server)
        .text(&doi, Some("apa"), Some("en-US"))
        .await
        .unwrap();
    assert_eq!(text, "Doe, J. (2021). Testing.\n");
}

#[tokio::test]
async fn test_bibtex_and_ris_formats() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_formats(&server).await;

    let doi = Doi::parse(DOI).unwrap();
    let client = client(&server);
    assert_eq!(client.bibtex(&doi).await.unwrap(), BIBTEX);
    assert_eq!(client.ris(&doi).await.unwrap(), RIS);
}

#[tokio::test]
async fn test_unknown_doi_is_status_error() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("DOI Not Found"))
        .mount(&server)
        .await;

    let err = client(&server)
        .bibtex(&Doi::parse("10.9999/missing").unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(404));
}

#[tokio::test]
async fn test_curated_citation_combines_sources() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_formats(&server).await;
    Mock::given(method("GET"))
        .and(path("/10.1000/xyz.1"))
        .and(header("Accept", "application/citeproc+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "journal-article",
            "title": ["Testing"],
            "container-title": "Chemistry",
            "publisher": "Example Press",
            "volume": 17,
            "page": "1-10",
            "published-print": {"date-parts": [[2021]]},
            "issued": {"date-parts": [[2021, 3, 8]]},
            "abstract": "<jats:title>Abstract</jats:title><jats:p>H<jats:sub>2</jats:sub>O</jats:p>",
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/abbreviso/a/Chemistry"))
        .respond_with(ResponseTemplate::new(200).set_body_string("chem."))
        .expect(1)
        .mount(&server)
        .await;

    let citation = client(&server)
        .curated(&Doi::parse(DOI).unwrap())
        .await
        .unwrap();

    assert_eq!(citation.doi, DOI);
    assert_eq!(citation.url, "https://doi.org/10.1000/xyz.1");
    assert_eq!(citation.kind.as_deref(), Some("journal-article"));
    assert_eq!(citation.title.as_deref(), Some("Testing"));
    assert_eq!(citation.journal.as_deref(), Some("Chemistry"));
    assert_eq!(citation.journal_abbr.as_deref(), Some("Chem."));
    assert_eq!(citation.volume.as_deref(), Some("17"));
    assert_eq!(citation.date_tuple, (2021, 3, 8));
    assert_eq!(citation.date, "8 March 2021");
    assert_eq!(citation.abstract_html.as_deref(), Some("H<sub>2</sub>O"));
    assert_eq!(citation.cite.bibtex, BIBTEX);

    let value = serde_json::to_value(&citation).unwrap();
    assert_eq!(value["type"], "journal-article");
    assert_eq!(value["cite"]["RIS"], RIS);
}

#[tokio::test]
async fn test_curated_uses_short_title_without_lookup() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_formats(&server).await;
    Mock::given(method("GET"))
        .and(path("/10.1000/xyz.1"))
        .and(header("Accept", "application/citeproc+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "container-title": ["Chemistry"],
            "container-title-short": ["Chem."],
            "created": {"date-parts": [[2020, 12]]},
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/abbreviso/a/Chemistry"))
        .respond_with(ResponseTemplate::new(200).set_body_string("chem."))
        .expect(0)
        .mount(&server)
        .await;

    let citation = client(&server)
        .curated(&Doi::parse(DOI).unwrap())
        .await
        .unwrap();
    assert_eq!(citation.journal_abbr.as_deref(), Some("Chem."));
    assert_eq!(citation.date, "1 December 2020");
}

#[tokio::test]
async fn test_curated_without_date_fails() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/10.1000/xyz.1"))
        .and(header("Accept", "application/citeproc+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"title": "Undated"})))
        .mount(&server)
        .await;

    let err = client(&server)
        .curated(&Doi::parse(DOI).unwrap())
        .await
        .unwrap_err();
    assert!(
        matches!(err, ProviderError::UnexpectedPayload { .. }),
        "got {err:?}"
    );
}
