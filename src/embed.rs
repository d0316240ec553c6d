// src/embed.rs
//
// Integración con la plataforma anfitriona cuando la app corre dentro de
// un iframe: lectura de parámetros de la URL y avisos por postMessage al
// documento padre. En nativo todo esto se reduce a variables de entorno
// y no-ops.

use serde_json::{Value, json};

use crate::model::QuizResult;

/// Parsea una query string "?a=1&b=2" sin depender de la API del navegador
pub fn parse_query(search: &str) -> Vec<(String, String)> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter(|p| !p.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

/// Mensaje que la plataforma espera al completarse un quiz: lleva el
/// resultado entero para que el padre pinte el progreso sin repedirlo.
pub fn quiz_submitted_message(tutorial_id: Option<u32>, result: &QuizResult) -> Value {
    json!({
        "type": "quiz-submitted",
        "tutorialId": tutorial_id,
        "result": result,
    })
}

/// Petición de navegación al padre (p. ej. volver al material del curso)
pub fn nav_parent_message(route: &str) -> Value {
    json!({
        "type": "nav-parent",
        "route": route,
    })
}

#[cfg(target_arch = "wasm32")]
fn query_param(name: &str) -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    parse_query(&search)
        .into_iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v)
        .filter(|v| !v.is_empty())
}

/// ¿Corre la app embebida en la plataforma (iframe con ?embed=1)?
#[cfg(target_arch = "wasm32")]
pub fn is_embedded() -> bool {
    query_param("embed").as_deref() == Some("1")
}

#[cfg(not(target_arch = "wasm32"))]
pub fn is_embedded() -> bool {
    false
}

/// Clave de usuario con la que se espacian las entradas de la caché
#[cfg(target_arch = "wasm32")]
pub fn user_key() -> Option<String> {
    query_param("user")
}

#[cfg(not(target_arch = "wasm32"))]
pub fn user_key() -> Option<String> {
    std::env::var("LEARNCHECK_USER")
        .ok()
        .filter(|s| !s.trim().is_empty())
}

/// Silencioso si no hay padre o el mensaje no se puede entregar
#[cfg(target_arch = "wasm32")]
fn post_to_parent(message: &Value) {
    let Some(parent) = web_sys::window().and_then(|w| w.parent().ok().flatten()) else {
        return;
    };
    let Ok(js_msg) = js_sys::JSON::parse(&message.to_string()) else {
        return;
    };
    if parent.post_message(&js_msg, "*").is_err() {
        log::warn!("postMessage al padre falló");
    }
}

#[cfg(target_arch = "wasm32")]
pub fn post_quiz_submitted(tutorial_id: Option<u32>, result: &QuizResult) {
    post_to_parent(&quiz_submitted_message(tutorial_id, result));
}

#[cfg(not(target_arch = "wasm32"))]
pub fn post_quiz_submitted(tutorial_id: Option<u32>, result: &QuizResult) {
    log::debug!(
        "quiz enviado (tutorial {tutorial_id:?}, nota {})",
        result.score
    );
}

#[cfg(target_arch = "wasm32")]
pub fn post_nav_parent(route: &str) {
    post_to_parent(&nav_parent_message(route));
}

#[cfg(not(target_arch = "wasm32"))]
pub fn post_nav_parent(route: &str) {
    log::debug!("navegación solicitada al padre: {route}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_pairs_and_tolerates_bare_keys() {
        let q = parse_query("?embed=1&user=u-42&flag");
        assert_eq!(q[0], ("embed".into(), "1".into()));
        assert_eq!(q[1], ("user".into(), "u-42".into()));
        assert_eq!(q[2], ("flag".into(), String::new()));
    }

    #[test]
    fn empty_query_yields_nothing() {
        assert!(parse_query("").is_empty());
        assert!(parse_query("?").is_empty());
    }

    #[test]
    fn submitted_message_carries_the_whole_result() {
        let result = QuizResult {
            score: 66.67,
            correct: 2,
            total: 3,
            duration_secs: 48,
            detail: Vec::new(),
            questions: Vec::new(),
            feedback: None,
            is_mock: false,
        };
        let msg = quiz_submitted_message(Some(35368), &result);
        assert_eq!(msg["type"], "quiz-submitted");
        assert_eq!(msg["tutorialId"], 35368);
        assert_eq!(msg["result"]["score"], 66.67);
        assert_eq!(msg["result"]["total"], 3);

        // El quiz final no tiene tutorial
        let msg = quiz_submitted_message(None, &result);
        assert!(msg["tutorialId"].is_null());
    }

    #[test]
    fn nav_message_names_the_route() {
        let msg = nav_parent_message("material");
        assert_eq!(msg["type"], "nav-parent");
        assert_eq!(msg["route"], "material");
    }
}
