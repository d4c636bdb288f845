use nightmeadow::loading::{LoadGate, LoadStatus, ReadyState};

#[test]
fn fires_once_after_the_last_resolution() {
    // Every arrival order must produce exactly one ready signal, after the
    // third token resolves.
    for order in [[0usize, 1, 2], [2, 1, 0], [1, 0, 2]] {
        let gate = LoadGate::new();
        let mut tokens: Vec<_> = (0..3)
            .map(|i| Some(gate.register(format!("load {i}"))))
            .collect();
        gate.seal();

        for (resolved, &slot) in order.iter().enumerate() {
            assert_eq!(gate.take_ready(), None, "fired after {resolved} of 3");
            tokens[slot].take().unwrap().resolve(LoadStatus::Loaded);
        }

        assert_eq!(gate.take_ready(), Some(ReadyState::Complete));
        assert_eq!(gate.take_ready(), None, "the signal is single-fire");
    }
}

#[test]
fn does_not_fire_before_sealing() {
    let gate = LoadGate::new();
    let token = gate.register("only load");
    token.resolve(LoadStatus::Loaded);
    // All tokens resolved, but more could still be registered.
    assert_eq!(gate.take_ready(), None);
    gate.seal();
    assert_eq!(gate.take_ready(), Some(ReadyState::Complete));
}

#[test]
fn failures_resolve_into_a_degraded_ready() {
    let gate = LoadGate::new();
    let a = gate.register("a");
    let b = gate.register("b");
    let c = gate.register("c");
    gate.seal();

    a.resolve(LoadStatus::Loaded);
    b.resolve(LoadStatus::Failed);
    assert_eq!(gate.take_ready(), None);
    c.resolve(LoadStatus::Failed);

    assert_eq!(gate.take_ready(), Some(ReadyState::Degraded { failed: 2 }));
}

#[test]
fn dropping_a_token_counts_as_failure() {
    let gate = LoadGate::new();
    let a = gate.register("a");
    {
        let _b = gate.register("b");
        // dropped unresolved, e.g. its load task panicked
    }
    gate.seal();
    assert_eq!(gate.take_ready(), None);
    a.resolve(LoadStatus::Loaded);
    assert_eq!(gate.take_ready(), Some(ReadyState::Degraded { failed: 1 }));
}

#[test]
fn pending_reflects_outstanding_tokens() {
    let gate = LoadGate::new();
    let a = gate.register("a");
    let b = gate.register("b");
    assert_eq!(gate.pending(), 2);
    a.resolve(LoadStatus::Loaded);
    assert_eq!(gate.pending(), 1);
    b.resolve(LoadStatus::Failed);
    assert_eq!(gate.pending(), 0);
}
