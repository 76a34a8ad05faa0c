//! Integration specifications for the screening workflow: résumé text
//! extraction feeding the opportunity relevance ranking.

mod common {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use candidate_ai::oracle::{OracleClient, OracleError, OracleRequest};
    use lopdf::{dictionary, Document, Object, Stream};

    pub struct ScriptedOracle {
        reply: Mutex<Option<Result<String, OracleError>>>,
        calls: AtomicUsize,
        last_prompt: Mutex<Option<String>>,
    }

    impl ScriptedOracle {
        pub fn replying(reply: impl Into<String>) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Some(Ok(reply.into()))),
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            })
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_prompt(&self) -> Option<String> {
            self.last_prompt.lock().expect("prompt mutex").clone()
        }
    }

    impl OracleClient for ScriptedOracle {
        async fn complete(&self, request: OracleRequest) -> Result<String, OracleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().expect("prompt mutex") = Some(request.user);
            self.reply
                .lock()
                .expect("reply mutex poisoned")
                .take()
                .unwrap_or(Err(OracleError::EmptyResponse))
        }
    }

    /// Minimal one-page digital PDF with the given text run.
    pub fn resume_pdf(text: &str) -> Vec<u8> {
        let mut doc = Document::with_version("1.4");

        let font_id = doc.add_object(dictionary! {
            "Type" => Object::Name(b"Font".to_vec()),
            "Subtype" => Object::Name(b"Type1".to_vec()),
            "BaseFont" => Object::Name(b"Helvetica".to_vec()),
        });

        let content = format!("BT /F1 11 Tf 72 720 Td ({text}) Tj ET");
        let content_id = doc.add_object(Object::Stream(Stream::new(
            dictionary! {},
            content.into_bytes(),
        )));

        let page_id = doc.add_object(dictionary! {
            "Type" => Object::Name(b"Page".to_vec()),
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => Object::Reference(font_id) },
            },
        });

        let pages_id = doc.add_object(dictionary! {
            "Type" => Object::Name(b"Pages".to_vec()),
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => Object::Integer(1),
        });

        if let Ok(Object::Dictionary(ref mut dict)) = doc.get_object_mut(page_id) {
            dict.set("Parent", Object::Reference(pages_id));
        }

        let catalog_id = doc.add_object(dictionary! {
            "Type" => Object::Name(b"Catalog".to_vec()),
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buf = Vec::new();
        doc.save_to(&mut buf).expect("pdf serializes");
        buf
    }
}

use std::io::Cursor;

use candidate_ai::workflows::screening::extraction::{
    DocumentExtractor, ExtractionError, OcrEngine, SourceStrategy,
};
use candidate_ai::workflows::screening::relevance::RelevanceMatcher;
use candidate_ai::workflows::screening::OpportunityCsvImporter;
use common::*;

struct UnreachableOcr;

impl OcrEngine for UnreachableOcr {
    async fn recognize(&self, _image_png: &[u8]) -> Result<String, ExtractionError> {
        panic!("text-rich documents must never reach optical recognition");
    }
}

const OPPORTUNITY_CSV: &str = "\
Id,Title,Description,Required Skills,Duration Minutes,Posted On
opp-be,Backend Engineer,Design and operate APIs backed by SQL storage.,rust;sql,45,2026-06-15
opp-fe,Frontend Engineer,Ship accessible dashboards in TypeScript.,typescript;css,30,2026-06-20
opp-da,Data Analyst,Turn warehouse tables into decisions.,sql;python,30,2026-07-02
";

#[tokio::test]
async fn extracted_resume_ranks_imported_opportunities() {
    let resume = resume_pdf(
        "Jordan Alvarez. Backend engineer with nine years of Rust and SQL, \
         operating high-traffic APIs, schema design, and incident response. \
         Comfortable across storage engines and query planners.",
    );

    let extractor = DocumentExtractor::new(UnreachableOcr);
    let extracted = extractor.extract(&resume).await.expect("extracts");
    assert_eq!(extracted.strategy, SourceStrategy::NativeLayer);
    assert_eq!(extracted.page_count, 1);
    assert!(extracted.content.contains("Rust"));

    let opportunities =
        OpportunityCsvImporter::from_reader(Cursor::new(OPPORTUNITY_CSV)).expect("import");
    assert_eq!(opportunities.len(), 3);

    let oracle = ScriptedOracle::replying(
        r#"```json
        [
          {"opportunity_id": "opp-be", "score": 92, "reason": "direct experience",
           "matching_skills": ["rust", "sql"], "missing_skills": []},
          {"opportunity_id": "opp-fe", "score": 35, "reason": "no frontend signal",
           "matching_skills": [], "missing_skills": ["typescript", "css"]},
          {"opportunity_id": "opp-da", "score": 64, "reason": "sql overlap",
           "matching_skills": ["sql"], "missing_skills": ["python"]}
        ]
        ```"#,
    );
    let matcher = RelevanceMatcher::new(oracle.clone());

    let matches = matcher.rank(&extracted.content, &opportunities).await;

    assert_eq!(oracle.calls(), 1, "one oracle pass covers every opportunity");
    let prompt = oracle.last_prompt().expect("prompt captured");
    assert!(prompt.contains("opp-be") && prompt.contains("opp-da"));

    let ordered: Vec<&str> = matches.iter().map(|m| m.opportunity_id.0.as_str()).collect();
    assert_eq!(ordered, vec!["opp-be", "opp-da", "opp-fe"]);
    assert_eq!(matches[0].score, 92);
    assert_eq!(matches[0].matching_skills, vec!["rust", "sql"]);
    assert_eq!(matches[2].missing_skills, vec!["typescript", "css"]);
}

#[tokio::test]
async fn ranking_degrades_to_unranked_when_the_oracle_rambles() {
    let resume = resume_pdf(
        "A long and perfectly ordinary resume describing a decade of useful \
         engineering work across several teams and stacks, with measurable \
         impact and a fondness for boring technology choices.",
    );

    let extractor = DocumentExtractor::new(UnreachableOcr);
    let extracted = extractor.extract(&resume).await.expect("extracts");

    let opportunities =
        OpportunityCsvImporter::from_reader(Cursor::new(OPPORTUNITY_CSV)).expect("import");

    let oracle = ScriptedOracle::replying("Honestly they all seem fine to me!");
    let matcher = RelevanceMatcher::new(oracle);

    let matches = matcher.rank(&extracted.content, &opportunities).await;
    assert!(matches.is_empty(), "caller falls back to unranked order");
}
