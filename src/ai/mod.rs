//! AI coach - Gemini-backed alternatives, technique tutorials and warm-up plans
//!
//! Every operation sends one prompt and expects a strict JSON payload
//! matching a fixed response schema. Failures are terminal for the request;
//! re-invocation is always user-triggered. Nothing here touches the log or
//! order state.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Environment variable holding the service credential
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

#[derive(Error, Debug)]
pub enum AiError {
    #[error("GEMINI_API_KEY non impostata")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Request(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("unexpected response shape: {0}")]
    Parse(String),
}

/// ---------------------------------------------------------------------------
/// Gemini API types
/// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
    #[serde(rename = "responseSchema")]
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorResponse {
    error: ServiceErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorDetail {
    message: String,
}

/// ---------------------------------------------------------------------------
/// Coach response shapes
/// ---------------------------------------------------------------------------

/// One suggested replacement exercise
#[derive(Debug, Clone, Deserialize)]
pub struct Alternative {
    pub name: String,
    pub reason: String,
}

/// Technique guide for one exercise
#[derive(Debug, Clone, Deserialize)]
pub struct Tutorial {
    pub execution: Vec<String>,
    pub mistakes: Vec<String>,
    pub tips: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WarmupStep {
    pub name: String,
    pub instruction: String,
}

/// Three-phase warm-up routine for one session
#[derive(Debug, Clone, Deserialize)]
pub struct WarmupPlan {
    pub mobility: Vec<WarmupStep>,
    pub activation: Vec<WarmupStep>,
    pub potentiation: String,
}

/// ---------------------------------------------------------------------------
/// Client
/// ---------------------------------------------------------------------------

pub struct CoachClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl CoachClient {
    /// Build a client from the environment. The credential check happens
    /// here, before any network call.
    pub fn from_env() -> Result<Self, AiError> {
        let api_key = std::env::var(API_KEY_VAR).map_err(|_| AiError::MissingApiKey)?;
        Ok(Self::new(api_key, GEMINI_API_URL.to_string()))
    }

    fn new(api_key: String, base_url: String) -> Self {
        Self { client: Client::new(), api_key, base_url }
    }

    /// Suggest replacement exercises honoring the user's search text
    pub fn alternatives(
        &self,
        name: &str,
        muscle: &str,
        function: Option<&str>,
        query: &str,
    ) -> Result<Vec<Alternative>, AiError> {
        let prompt = format!(
            r#"Suggerisci 3 esercizi alternativi a "{}" (Gruppo muscolare: {}, Funzione: {}).
IMPORTANTE: Usa il termine anatomico "ischiocrurali" invece di "tendini del ginocchio".
Il termine di ricerca dell'utente è: "{}".
Fornisci una risposta concisa e utile."#,
            name,
            muscle,
            function.unwrap_or("N/A"),
            query,
        );

        let schema = json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "name": { "type": "STRING" },
                    "reason": { "type": "STRING" }
                },
                "required": ["name", "reason"]
            }
        });

        let text = self.generate(&prompt, schema)?;
        parse_payload(&text)
    }

    /// Step-by-step execution guide for one exercise
    pub fn tutorial(&self, exercise_name: &str) -> Result<Tutorial, AiError> {
        let prompt = format!(
            r#"Spiega dettagliatamente come eseguire correttamente l'esercizio "{}".
Focalizzati sulla biomeccanica corretta.
IMPORTANTE: Usa il termine anatomico "ischiocrurali" invece di "tendini del ginocchio".
Rispondi in formato JSON con questa struttura:
{{
  "execution": ["Passo 1...", "Passo 2...", ...],
  "mistakes": ["Errore 1...", "Errore 2...", ...],
  "tips": "Un consiglio tecnico avanzato."
}}"#,
            exercise_name,
        );

        let schema = json!({
            "type": "OBJECT",
            "properties": {
                "execution": { "type": "ARRAY", "items": { "type": "STRING" } },
                "mistakes": { "type": "ARRAY", "items": { "type": "STRING" } },
                "tips": { "type": "STRING" }
            },
            "required": ["execution", "mistakes", "tips"]
        });

        let text = self.generate(&prompt, schema)?;
        parse_payload(&text)
    }

    /// Session warm-up routine from the day focus and its planned exercises
    pub fn warmup_plan(&self, focus: &str, exercise_names: &[String]) -> Result<WarmupPlan, AiError> {
        let prompt = format!(
            r#"Agisci come un coach esperto di ipertrofia e biomeccanica aggiornato sugli ultimi studi scientifici.
Crea una routine di riscaldamento specifica per la sessione di oggi: "{}".

Esercizi previsti: {}.

Struttura la risposta in 3 fasi:
1. Mobilità Articolare (Joint Mobility): Movimenti dinamici specifici per le articolazioni coinvolte. IMPORTANTE: Per ogni esercizio, fornisci una spiegazione pratica su come eseguirlo.
2. Attivazione Specifica (Activation): Esercizi a basso carico per attivare i muscoli target. IMPORTANTE: Per ogni esercizio, fornisci una spiegazione pratica su come eseguirlo.
3. Avvicinamento al carico (Potentiation): Consigli su come gestire le serie di avvicinamento (warm-up sets) per il primo esercizio composto.

Rispondi in JSON:
{{
  "mobility": [
     {{ "name": "Nome Esercizio", "instruction": "Spiegazione breve e pratica su come fare il movimento..." }}
  ],
  "activation": [
    {{ "name": "Nome Esercizio", "instruction": "Spiegazione breve e pratica su come fare il movimento..." }}
  ],
  "potentiation": "Consiglio specifico..."
}}"#,
            focus,
            exercise_names.join(", "),
        );

        let step_schema = json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "name": { "type": "STRING" },
                    "instruction": { "type": "STRING" }
                },
                "required": ["name", "instruction"]
            }
        });
        let schema = json!({
            "type": "OBJECT",
            "properties": {
                "mobility": step_schema,
                "activation": step_schema,
                "potentiation": { "type": "STRING" }
            },
            "required": ["mobility", "activation", "potentiation"]
        });

        let text = self.generate(&prompt, schema)?;
        parse_payload(&text)
    }

    /// One generateContent round trip, returning the raw candidate text
    fn generate(&self, prompt: &str, response_schema: serde_json::Value) -> Result<String, AiError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, GEMINI_MODEL, self.api_key
        );

        let request = GenerateRequest {
            contents: vec![Content { parts: vec![Part { text: prompt.to_string() }] }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .map_err(|e| AiError::Request(e.to_string()))?;

        let status = response.status();
        let body = response.text().map_err(|e| AiError::Request(e.to_string()))?;

        if !status.is_success() {
            if let Ok(err) = serde_json::from_str::<ServiceErrorResponse>(&body) {
                return Err(AiError::Api(err.error.message));
            }
            return Err(AiError::Api(format!("HTTP {}: {}", status, body)));
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| AiError::Parse(e.to_string()))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| AiError::Parse("no text candidate in response".to_string()))
    }
}

fn parse_payload<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, AiError> {
    let json = extract_json(text)?;
    serde_json::from_str(&json).map_err(|e| AiError::Parse(format!("{}: {}", e, json)))
}

/// Extract the JSON payload from a model response (tolerates markdown fences)
fn extract_json(text: &str) -> Result<String, AiError> {
    let trimmed = text.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Ok(trimmed.to_string());
    }

    if let Some(start) = text.find("```json") {
        let start = start + 7;
        if let Some(end) = text[start..].find("```") {
            return Ok(text[start..start + end].trim().to_string());
        }
    }

    if let Some(start) = text.find("```") {
        let start = start + 3;
        // Skip language identifier if present
        let content_start = text[start..]
            .find('\n')
            .map(|i| start + i + 1)
            .unwrap_or(start);
        if let Some(end) = text[content_start..].find("```") {
            return Ok(text[content_start..content_start + end].trim().to_string());
        }
    }

    // Last resort: the outermost object or array, whichever opens first
    let object = text.find('{').zip(text.rfind('}'));
    let array = text.find('[').zip(text.rfind(']'));
    let span = match (object, array) {
        (Some(o), Some(a)) => Some(if a.0 < o.0 { a } else { o }),
        (o, a) => o.or(a),
    };
    if let Some((start, end)) = span
        && start < end
    {
        return Ok(text[start..=end].to_string());
    }

    Err(AiError::Parse("no JSON payload in response".to_string()))
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn candidate_body(payload: &str) -> String {
        json!({
            "candidates": [
                { "content": { "role": "model", "parts": [{ "text": payload }] } }
            ]
        })
        .to_string()
    }

    fn mock_client(server: &mockito::Server) -> CoachClient {
        CoachClient::new("test-key".to_string(), server.url())
    }

    const GENERATE_PATH: &str = "/models/gemini-2.5-flash:generateContent";

    #[test]
    fn test_extract_json_direct() {
        let input = r#"{"tips": "brace hard", "execution": []}"#;
        assert!(extract_json(input).unwrap().contains("tips"));
    }

    #[test]
    fn test_extract_json_direct_array() {
        let input = r#"[{"name": "Chest Press", "reason": "same pattern"}]"#;
        assert!(extract_json(input).unwrap().starts_with('['));
    }

    #[test]
    fn test_extract_json_code_block() {
        let input = "Ecco la guida:\n\n```json\n{\"tips\": \"ok\"}\n```\n";
        assert_eq!(extract_json(input).unwrap(), "{\"tips\": \"ok\"}");
    }

    #[test]
    fn test_extract_json_fallback_span() {
        let input = r#"La risposta è {"tips": "ok"} come richiesto."#;
        assert_eq!(extract_json(input).unwrap(), r#"{"tips": "ok"}"#);
    }

    #[test]
    fn test_extract_json_none() {
        assert!(extract_json("nessun dato disponibile").is_err());
    }

    #[test]
    fn test_alternatives_parses_list() {
        let mut server = mockito::Server::new();
        let payload = r#"[
            {"name": "Panca piana manubri", "reason": "stesso pattern di spinta"},
            {"name": "Chest Press", "reason": "traiettoria guidata"},
            {"name": "Dip alle parallele", "reason": "enfasi sul petto basso"}
        ]"#;
        let _m = server
            .mock("POST", GENERATE_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(candidate_body(payload))
            .create();

        let client = mock_client(&server);
        let alts = client
            .alternatives("Chest Press", "Petto", Some("Spinta orizzontale"), "alternativa")
            .unwrap();
        assert_eq!(alts.len(), 3);
        assert_eq!(alts[0].name, "Panca piana manubri");
    }

    #[test]
    fn test_tutorial_parses_fenced_payload() {
        let mut server = mockito::Server::new();
        let payload = "```json\n{\"execution\": [\"Setup\"], \"mistakes\": [\"Rimbalzo\"], \"tips\": \"Scapole addotte\"}\n```";
        let _m = server
            .mock("POST", GENERATE_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(candidate_body(payload))
            .create();

        let client = mock_client(&server);
        let tutorial = client.tutorial("Back Squat").unwrap();
        assert_eq!(tutorial.execution, vec!["Setup"]);
        assert_eq!(tutorial.tips, "Scapole addotte");
    }

    #[test]
    fn test_warmup_plan_parses_schema() {
        let mut server = mockito::Server::new();
        let payload = r#"{
            "mobility": [{"name": "Cat-camel", "instruction": "10 cicli lenti"}],
            "activation": [{"name": "Band pull-apart", "instruction": "2x15"}],
            "potentiation": "2 serie di avvicinamento al 50% e 75%"
        }"#;
        let _m = server
            .mock("POST", GENERATE_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(candidate_body(payload))
            .create();

        let client = mock_client(&server);
        let plan = client.warmup_plan("Full Pull", &["T-Bar Row".to_string()]).unwrap();
        assert_eq!(plan.mobility.len(), 1);
        assert_eq!(plan.activation[0].name, "Band pull-apart");
    }

    #[test]
    fn test_schema_mismatch_is_parse_error() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("POST", GENERATE_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(candidate_body(r#"{"passi": ["sbagliato"]}"#))
            .create();

        let client = mock_client(&server);
        assert!(matches!(client.tutorial("Back Squat"), Err(AiError::Parse(_))));
    }

    #[test]
    fn test_api_error_message_is_extracted() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("POST", GENERATE_PATH)
            .match_query(Matcher::Any)
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#)
            .create();

        let client = mock_client(&server);
        match client.tutorial("Back Squat") {
            Err(AiError::Api(msg)) => assert_eq!(msg, "API key not valid"),
            other => panic!("expected Api error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_empty_candidates_is_parse_error() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("POST", GENERATE_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates": []}"#)
            .create();

        let client = mock_client(&server);
        assert!(matches!(client.tutorial("Back Squat"), Err(AiError::Parse(_))));
    }
}
