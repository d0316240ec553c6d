// src/storage.rs
//
// Almacén clave-valor inyectable (memoria, fichero o localStorage) y la
// caché de resultados por usuario construida encima. Cualquier fallo de
// lectura o JSON corrupto se trata como caché vacía, nunca como error
// hacia el llamador.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::model::{QuizResult, SubmoduleResult};
use crate::session::SessionSnapshot;

/// Capacidad de persistencia que se inyecta en la app; permite usar un
/// almacén en memoria en los tests.
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// Almacén en memoria (tests y fallback cuando no hay persistencia)
#[derive(Default)]
pub struct MemoryStore {
    map: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }
    fn set(&mut self, key: &str, value: &str) {
        self.map.insert(key.to_string(), value.to_string());
    }
    fn remove(&mut self, key: &str) {
        self.map.remove(key);
    }
}

/// Almacén nativo: un único JSON en disco con todas las claves
#[cfg(not(target_arch = "wasm32"))]
pub struct FileStore {
    path: std::path::PathBuf,
    map: HashMap<String, String>,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        let path = path.into();
        let map = match std::fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(map) => map,
                Err(e) => {
                    log::warn!("Almacén corrupto en {}: {e}; se parte de cero", path.display());
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self { path, map }
    }

    fn persist(&self) {
        match serde_json::to_string(&self.map) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.path, json) {
                    log::warn!("No se pudo escribir {}: {e}", self.path.display());
                }
            }
            Err(e) => log::warn!("No se pudo serializar el almacén: {e}"),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }
    fn set(&mut self, key: &str, value: &str) {
        self.map.insert(key.to_string(), value.to_string());
        self.persist();
    }
    fn remove(&mut self, key: &str) {
        self.map.remove(key);
        self.persist();
    }
}

/// Almacén wasm: localStorage del navegador
#[cfg(target_arch = "wasm32")]
pub struct LocalStore;

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

#[cfg(target_arch = "wasm32")]
impl KvStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }
    fn set(&mut self, key: &str, value: &str) {
        if let Some(s) = Self::storage() {
            if s.set_item(key, value).is_err() {
                log::warn!("localStorage rechazó la clave {key}");
            }
        }
    }
    fn remove(&mut self, key: &str) {
        if let Some(s) = Self::storage() {
            let _ = s.remove_item(key);
        }
    }
}

/// Clave de usuario cuando no hay sesión iniciada
pub const ANON_USER_KEY: &str = "anon";

const FINAL_RESULT_KEY: &str = "quiz-final-result";
const AGGREGATES_KEY: &str = "submodule-results";

/// Caché durable de resultados, con claves con espacio de nombres por
/// usuario. La escribe únicamente el controlador de sesión al terminar
/// un intento; el dashboard solo lee.
pub struct ResultCache {
    store: Box<dyn KvStore>,
    user_key: String,
}

impl ResultCache {
    pub fn new(store: Box<dyn KvStore>, user_key: Option<String>) -> Self {
        let user_key = user_key
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| ANON_USER_KEY.to_string());
        Self { store, user_key }
    }

    pub fn user_key(&self) -> &str {
        &self.user_key
    }

    fn key(&self, suffix: &str) -> String {
        format!("{}:{}", self.user_key, suffix)
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(v) => Some(v),
            Err(e) => {
                // JSON corrupto == no hay datos
                log::warn!("Entrada corrupta en {key}: {e}");
                None
            }
        }
    }

    fn write_json<T: Serialize>(&mut self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.store.set(key, &json),
            Err(e) => log::warn!("No se pudo serializar {key}: {e}"),
        }
    }

    /// Guarda el resultado de un submódulo y funde la entrada del
    /// agregado: intentos +1, el resto se sustituye por el último intento.
    pub fn put(&mut self, tutorial_id: u32, name: &str, result: &QuizResult) {
        let key = self.key(&format!("quiz-result-{tutorial_id}"));
        self.write_json(&key, result);

        let mut aggregates = self.aggregates();
        let attempts = aggregates
            .iter()
            .find(|a| a.id == tutorial_id)
            .map(|a| a.attempts + 1)
            .unwrap_or(1);
        let entry = SubmoduleResult {
            id: tutorial_id,
            name: name.to_string(),
            score: result.score,
            correct: result.correct,
            total: result.total,
            duration_secs: result.duration_secs,
            attempts,
        };
        match aggregates.iter_mut().find(|a| a.id == tutorial_id) {
            Some(slot) => *slot = entry,
            None => aggregates.push(entry),
        }
        let agg_key = self.key(AGGREGATES_KEY);
        self.write_json(&agg_key, &aggregates);
    }

    pub fn get(&self, tutorial_id: u32) -> Option<QuizResult> {
        self.read_json(&self.key(&format!("quiz-result-{tutorial_id}")))
    }

    pub fn put_final(&mut self, result: &QuizResult) {
        let key = self.key(FINAL_RESULT_KEY);
        self.write_json(&key, result);
    }

    pub fn get_final(&self) -> Option<QuizResult> {
        self.read_json(&self.key(FINAL_RESULT_KEY))
    }

    pub fn aggregates(&self) -> Vec<SubmoduleResult> {
        self.read_json(&self.key(AGGREGATES_KEY)).unwrap_or_default()
    }

    /// Borra resultado y snapshot de un submódulo; se llama antes de un
    /// reintento para que no salte la detección de "ya completado".
    pub fn clear(&mut self, tutorial_id: u32) {
        let result_key = self.key(&format!("quiz-result-{tutorial_id}"));
        let snapshot_key = self.key(&format!("quiz-progress-{tutorial_id}"));
        self.store.remove(&result_key);
        self.store.remove(&snapshot_key);
    }

    pub fn put_snapshot(&mut self, tutorial_id: u32, snapshot: &SessionSnapshot) {
        let key = self.key(&format!("quiz-progress-{tutorial_id}"));
        self.write_json(&key, snapshot);
    }

    pub fn get_snapshot(&self, tutorial_id: u32) -> Option<SessionSnapshot> {
        self.read_json(&self.key(&format!("quiz-progress-{tutorial_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::round_score;

    fn sample_result(correct: u32, total: u32) -> QuizResult {
        QuizResult {
            score: round_score(correct, total),
            correct,
            total,
            duration_secs: 42,
            detail: vec![],
            questions: vec![],
            feedback: None,
            is_mock: false,
        }
    }

    fn cache() -> ResultCache {
        ResultCache::new(Box::new(MemoryStore::new()), Some("u1".into()))
    }

    #[test]
    fn put_then_get_round_trips() {
        let mut c = cache();
        let r = sample_result(2, 3);
        c.put(35368, "Introducción a la IA", &r);
        assert_eq!(c.get(35368), Some(r));
        assert_eq!(c.get(99999), None);
    }

    #[test]
    fn aggregates_merge_attempts_and_replace_latest() {
        let mut c = cache();
        c.put(35368, "Introducción a la IA", &sample_result(1, 3));
        c.put(35368, "Introducción a la IA", &sample_result(3, 3));

        let aggs = c.aggregates();
        assert_eq!(aggs.len(), 1);
        assert_eq!(aggs[0].attempts, 2);
        assert_eq!(aggs[0].correct, 3); // siempre el último intento
        assert_eq!(aggs[0].score, 100.0);
    }

    #[test]
    fn clear_removes_result_but_keeps_aggregate() {
        let mut c = cache();
        c.put(35368, "Introducción a la IA", &sample_result(2, 3));
        c.clear(35368);
        assert_eq!(c.get(35368), None);
        assert_eq!(c.aggregates().len(), 1);
    }

    #[test]
    fn corrupted_json_is_a_cache_miss() {
        let mut store = MemoryStore::new();
        store.set("u1:quiz-result-35368", "{esto no es json");
        store.set("u1:submodule-results", "[1,2,");
        let c = ResultCache::new(Box::new(store), Some("u1".into()));
        assert_eq!(c.get(35368), None);
        assert!(c.aggregates().is_empty());
    }

    #[test]
    fn missing_user_falls_back_to_anon_namespace() {
        let c = ResultCache::new(Box::new(MemoryStore::new()), None);
        assert_eq!(c.user_key(), ANON_USER_KEY);
        let c = ResultCache::new(Box::new(MemoryStore::new()), Some("  ".into()));
        assert_eq!(c.user_key(), ANON_USER_KEY);
    }

    #[test]
    fn final_result_round_trips() {
        let mut c = cache();
        assert_eq!(c.get_final(), None);
        let r = sample_result(7, 10);
        c.put_final(&r);
        assert_eq!(c.get_final(), Some(r));
    }
}
