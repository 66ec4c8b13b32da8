use super::*;
use storage::MemorySessionStore;

fn session(store: MemorySessionStore) -> PuzzleSession<MemorySessionStore> {
    PuzzleSession::new(PuzzleName::new("treasure_as"), store)
}

fn item(ch: char, row: usize, col: usize) -> SelectedChar {
    SelectedChar { ch, row, col }
}

#[test]
fn namespaces_keys_by_puzzle() {
    let mut session = session(MemorySessionStore::new());
    assert_eq!(session.key(WORDS_KEY), "treasure_as_words");

    session.save(DIRECTION_KEY, &Option::<Direction>::None).expect("save");
    assert_eq!(
        session
            .store()
            .get_item("treasure_as_currDirection")
            .expect("get")
            .as_deref(),
        Some("null")
    );
}

#[test]
fn missing_state_loads_empty() {
    let session = session(MemorySessionStore::new());
    assert_eq!(session.load_state(), PuzzleSessionState::default());
}

#[test]
fn loads_persisted_state() {
    let mut session = session(MemorySessionStore::new());
    let selection = vec![item('D', 1, 0), item('O', 1, 1)];
    let words = vec![FoundWord::from_selection(vec![item('C', 0, 0), item('A', 0, 1)])];
    session.save(CHAR_LIST_KEY, &selection).expect("selection");
    session.save(WORDS_KEY, &words).expect("words");
    session
        .save(DIRECTION_KEY, &Some(Direction { d_row: 0, d_col: 1 }))
        .expect("direction");

    let state = session.load_state();
    assert_eq!(state.selection, selection);
    assert_eq!(state.words, words);
    assert_eq!(state.direction, Some(Direction { d_row: 0, d_col: 1 }));
}

#[test]
fn malformed_values_load_as_empty() {
    let mut store = MemorySessionStore::new();
    store
        .set_item("treasure_as_words", "{not json".into())
        .expect("words");
    store
        .set_item("treasure_as_char_list", r#"[{"char":"C","row":0,"col":0}]"#.into())
        .expect("selection");
    let session = session(store);

    assert!(matches!(
        session.load::<Vec<FoundWord>>(WORDS_KEY),
        Err(FinderError::MalformedSession { .. })
    ));

    let state = session.load_state();
    assert!(state.words.is_empty());
    assert_eq!(state.selection, vec![item('C', 0, 0)]);
}

#[test]
fn broken_chain_is_discarded() {
    let mut session = session(MemorySessionStore::new());
    let bent = vec![item('C', 0, 0), item('A', 0, 1), item('G', 1, 2)];
    session.save(CHAR_LIST_KEY, &bent).expect("selection");

    let state = session.load_state();
    assert!(state.selection.is_empty());
    assert_eq!(state.direction, None);
}

#[test]
fn direction_is_recomputed_from_chain() {
    let mut session = session(MemorySessionStore::new());
    session
        .save(CHAR_LIST_KEY, &vec![item('C', 0, 0), item('O', 1, 1)])
        .expect("selection");
    session.save(DIRECTION_KEY, &Option::<Direction>::None).expect("direction");

    assert_eq!(
        session.load_state().direction,
        Some(Direction { d_row: 1, d_col: 1 })
    );
}
