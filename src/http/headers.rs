//! # Headers de un Request
//! src/http/headers.rs
//!
//! Secuencia ordenada de pares `Name: Value` tal como llegaron por el
//! socket. No se eliminan duplicados y se conserva el orden del cable,
//! aunque la búsqueda no depende del orden.

/// Un header HTTP individual
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    name: String,
    value: String,
}

impl Header {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Headers de un request, en orden de llegada
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderStore {
    entries: Vec<Header>,
}

impl HeaderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Agrega un header al final.
    ///
    /// Nombre y valor se recortan; retorna `false` (sin insertar) si alguno
    /// queda vacío.
    pub fn push(&mut self, name: &str, value: &str) -> bool {
        let name = name.trim();
        let value = value.trim();
        if name.is_empty() || value.is_empty() {
            return false;
        }

        self.entries.push(Header {
            name: name.to_string(),
            value: value.to_string(),
        });
        true
    }

    /// Primer valor cuyo nombre coincide (sin distinguir mayúsculas)
    ///
    /// # Ejemplo
    /// ```
    /// use rootd::http::HeaderStore;
    ///
    /// let mut headers = HeaderStore::new();
    /// headers.push("Host", "localhost:9898");
    /// assert_eq!(headers.get("host"), Some("localhost:9898"));
    /// ```
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_order_and_duplicates() {
        let mut headers = HeaderStore::new();
        assert!(headers.push("Accept", "text/html"));
        assert!(headers.push("Host", "example.com"));
        assert!(headers.push("Accept", "*/*"));

        let names: Vec<&str> = headers.iter().map(|h| h.name()).collect();
        assert_eq!(names, vec!["Accept", "Host", "Accept"]);
        assert_eq!(headers.len(), 3);
    }

    #[test]
    fn test_push_trims_and_rejects_empty() {
        let mut headers = HeaderStore::new();
        assert!(headers.push("  User-Agent ", "  curl/8.0  "));
        assert!(!headers.push("   ", "value"));
        assert!(!headers.push("X-Empty", "   "));

        assert_eq!(headers.len(), 1);
        let header = headers.iter().next().unwrap();
        assert_eq!(header.name(), "User-Agent");
        assert_eq!(header.value(), "curl/8.0");
    }

    #[test]
    fn test_get_is_case_insensitive_first_match() {
        let mut headers = HeaderStore::new();
        headers.push("accept-language", "es");
        headers.push("Accept-Language", "en");

        assert_eq!(headers.get("Accept-Language"), Some("es"));
        assert_eq!(headers.get("Connection"), None);
        assert!(!headers.is_empty());
    }
}
