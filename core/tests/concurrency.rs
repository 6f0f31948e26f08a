use std::collections::BTreeSet;
use std::sync::Barrier;
use std::thread;

use skirmish_core::*;

const MINE: Coord2 = (2, 2);

fn one_mine_among_targets() -> (MineLayout, Vec<Coord2>) {
    let layout =
        MineLayout::from_mine_coords(5, &[MINE, (0, 0), (0, 4), (4, 0), (4, 4)]).unwrap();
    // ten safe cells plus the mine, so the session can never be won before the mine is hit
    let mut targets: Vec<Coord2> = iter_coords(5)
        .filter(|&coords| !layout.contains_mine(coords))
        .take(10)
        .collect();
    targets.push(MINE);
    (layout, targets)
}

#[test]
fn concurrent_reveals_lose_exactly_once() {
    for _ in 0..50 {
        let registry: SessionRegistry = SessionRegistry::default();
        let (layout, targets) = one_mine_among_targets();
        let (id, _) = registry.start_mines_with_layout(layout);
        let barrier = Barrier::new(targets.len());

        let outcomes: Vec<RevealOutcome> = thread::scope(|scope| {
            let handles: Vec<_> = targets
                .iter()
                .enumerate()
                .map(|(player, &(row, col))| {
                    let (registry, barrier, id) = (&registry, &barrier, &id);
                    scope.spawn(move || {
                        barrier.wait();
                        registry
                            .reveal(id, row, col, &format!("player{player}"))
                            .unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let lost: Vec<_> = outcomes
            .iter()
            .filter(|o| matches!(o, RevealOutcome::Lost { .. }))
            .collect();
        assert_eq!(lost.len(), 1, "{outcomes:?}");

        let continued = outcomes
            .iter()
            .filter(|o| matches!(o, RevealOutcome::Continue { .. }))
            .count();
        let over = outcomes
            .iter()
            .filter(|o| matches!(o, RevealOutcome::AlreadyOver { .. }))
            .count();
        assert_eq!(continued + over + 1, targets.len(), "{outcomes:?}");

        // only reveals applied before the loss count on the board
        let grid = registry.snapshot(&id).unwrap();
        assert_eq!(grid.state, SessionState::Lost);
        assert_eq!(usize::from(grid.revealed), continued);

        let RevealOutcome::Lost { actor } = lost[0] else {
            unreachable!()
        };
        assert_eq!(grid.verdict.unwrap().actor.as_ref(), Some(actor));
    }
}

#[test]
fn concurrent_picks_resolve_exactly_once() {
    for _ in 0..50 {
        let registry: SessionRegistry = SessionRegistry::default();
        registry.start_rps(42).unwrap();
        let barrier = Barrier::new(8);

        let results: Vec<Result<MatchStatus>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|participant| {
                    let (registry, barrier) = (&registry, &barrier);
                    scope.spawn(move || {
                        barrier.wait();
                        registry.pick_move(42, participant, &format!("p{participant}"), Move::Rock)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let resolved = results
            .iter()
            .filter(|r| matches!(r, Ok(MatchStatus::Resolved { .. })))
            .count();
        let waiting = results
            .iter()
            .filter(|r| matches!(r, Ok(MatchStatus::Waiting { count: 1 })))
            .count();
        let stale = results
            .iter()
            .filter(|r| matches!(r, Err(GameError::GroupStale)))
            .count();

        assert_eq!((resolved, waiting, stale), (1, 1, 6), "{results:?}");
        assert_eq!(registry.match_count(), 0);
    }
}

#[test]
fn concurrent_starts_get_distinct_ids() {
    let registry: SessionRegistry = SessionRegistry::default();

    let ids: Vec<SessionId> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = &registry;
                scope.spawn(move || {
                    (0..50)
                        .map(|_| registry.start_mines().unwrap().0)
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });

    let unique: BTreeSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), 400);
    assert_eq!(registry.session_count(), 400);
}

#[test]
fn sessions_progress_independently() {
    let registry: SessionRegistry = SessionRegistry::default();
    let layout = MineLayout::from_mine_coords(5, &[(0, 0)]).unwrap();
    let ids: Vec<SessionId> = (0..4)
        .map(|_| registry.start_mines_with_layout(layout.clone()).0)
        .collect();

    thread::scope(|scope| {
        for id in &ids {
            let registry = &registry;
            scope.spawn(move || {
                for (row, col) in iter_coords(5).skip(1) {
                    registry.reveal(id, row, col, "solo").unwrap();
                }
            });
        }
    });

    for id in &ids {
        let grid = registry.snapshot(id).unwrap();
        assert_eq!(grid.state, SessionState::Won);
        assert_eq!(grid.revealed, 24);
    }
}
