use common::Whisper;

/// Data access for the whisper collection. The API layer only ever talks to
/// the store through this trait.
#[axum::async_trait]
pub trait WhisperStore: Send + Sync {
    /// Every whisper, in insertion order.
    async fn get_all(&self) -> anyhow::Result<Vec<Whisper>>;

    async fn get_by_id(&self, id: u64) -> anyhow::Result<Option<Whisper>>;

    /// Assigns the next free id, appends the whisper and persists it.
    async fn create(&self, message: String) -> anyhow::Result<Whisper>;

    async fn update_by_id(&self, id: u64, message: String) -> anyhow::Result<Mutation>;

    async fn delete_by_id(&self, id: u64) -> anyhow::Result<Mutation>;
}

/// Outcome of an update or delete.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Applied,
    NotFound,
}

/// The ordered in-memory form of the collection. Stores load one of these,
/// apply a single operation to it and write it back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    whispers: Vec<Whisper>,
}

impl Collection {
    pub fn new(whispers: Vec<Whisper>) -> Self {
        Self { whispers }
    }

    pub fn whispers(&self) -> &[Whisper] {
        &self.whispers
    }

    pub fn into_whispers(self) -> Vec<Whisper> {
        self.whispers
    }

    pub fn get(&self, id: u64) -> Option<&Whisper> {
        self.whispers.iter().find(|w| w.id == id)
    }

    /// One past the highest id in use. Matches `len() + 1` until something is
    /// deleted, and never hands out an id that is still held.
    pub fn next_id(&self) -> anyhow::Result<u64> {
        match self.whispers.iter().map(|w| w.id).max() {
            None => Ok(1),
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| anyhow::anyhow!("whisper ids exhausted, highest id is {max}")),
        }
    }

    pub fn create(&mut self, message: String) -> anyhow::Result<Whisper> {
        let whisper = Whisper::new(self.next_id()?, message);
        self.whispers.push(whisper.clone());
        Ok(whisper)
    }

    pub fn update(&mut self, id: u64, message: String) -> Mutation {
        match self.whispers.iter_mut().find(|w| w.id == id) {
            Some(whisper) => {
                whisper.message = message;
                Mutation::Applied
            }
            None => Mutation::NotFound,
        }
    }

    pub fn delete(&mut self, id: u64) -> Mutation {
        match self.whispers.iter().position(|w| w.id == id) {
            Some(index) => {
                self.whispers.remove(index);
                Mutation::Applied
            }
            None => Mutation::NotFound,
        }
    }
}

/// Decodes the backing file. Anything that is not a JSON array of whispers is
/// read as the empty collection.
pub fn decode(bytes: &[u8]) -> Vec<Whisper> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Vec::new();
    }

    match serde_json::from_slice(bytes) {
        Ok(whispers) => whispers,
        Err(err) => {
            tracing::warn!(%err, "backing file is not a whisper array, treating it as empty");
            Vec::new()
        }
    }
}

pub fn encode(whispers: &[Whisper]) -> anyhow::Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(whispers)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures() -> Collection {
        Collection::new(vec![
            Whisper::new(1, "test"),
            Whisper::new(2, "Hello World"),
        ])
    }

    #[test]
    fn next_id_starts_at_one() {
        assert_eq!(Collection::default().next_id().unwrap(), 1);
    }

    #[test]
    fn create_fails_when_ids_are_exhausted() {
        let mut collection = Collection::new(decode(
            b"[{\"id\":18446744073709551615,\"message\":\"x\"}]",
        ));

        assert!(collection.next_id().is_err());
        assert!(collection.create("y".into()).is_err());
        assert_eq!(collection.whispers().len(), 1);
    }

    #[test]
    fn create_appends_with_count_plus_one() {
        let mut collection = fixtures();

        let created = collection.create("test 3".into()).unwrap();

        assert_eq!(created, Whisper::new(3, "test 3"));
        assert_eq!(collection.whispers().last(), Some(&created));
        assert_eq!(collection.get(3), Some(&created));
    }

    #[test]
    fn ids_stay_unique_after_delete() {
        let mut collection = fixtures();

        assert_eq!(collection.delete(1), Mutation::Applied);
        let created = collection.create("again".into()).unwrap();

        assert_eq!(created.id, 3);
        let ids: Vec<u64> = collection.whispers().iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn update_replaces_message_and_keeps_id() {
        let mut collection = fixtures();

        assert_eq!(collection.update(1, "updated".into()), Mutation::Applied);

        assert_eq!(collection.get(1), Some(&Whisper::new(1, "updated")));
        assert_eq!(collection.whispers().len(), 2);
    }

    #[test]
    fn missing_id_is_not_found_and_untouched() {
        let mut collection = fixtures();

        assert_eq!(collection.update(12345, "updated".into()), Mutation::NotFound);
        assert_eq!(collection.delete(12345), Mutation::NotFound);
        assert_eq!(collection, fixtures());
        assert!(collection.get(12345).is_none());
    }

    #[test]
    fn delete_keeps_survivor_order() {
        let mut collection = Collection::new(vec![
            Whisper::new(1, "a"),
            Whisper::new(2, "b"),
            Whisper::new(3, "c"),
        ]);

        assert_eq!(collection.delete(2), Mutation::Applied);

        assert_eq!(
            collection.into_whispers(),
            vec![Whisper::new(1, "a"), Whisper::new(3, "c")]
        );
    }

    #[test]
    fn decode_is_lenient() {
        assert!(decode(b"").is_empty());
        assert!(decode(b"  \n").is_empty());
        assert!(decode(b"not json").is_empty());
        assert!(decode(b"{\"id\": 1, \"message\": \"x\"}").is_empty());
        assert!(decode(b"[{\"id\": \"one\"}]").is_empty());
        assert!(decode(b"[1, 2").is_empty());
    }

    #[test]
    fn decode_reads_encoded_array() {
        let whispers = fixtures().into_whispers();

        let bytes = encode(&whispers).unwrap();

        assert_eq!(decode(&bytes), whispers);
        assert_eq!(decode(b"[]"), Vec::<Whisper>::new());
    }
}
