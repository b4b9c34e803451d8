//! Integration tests for complete matches.
//!
//! These tests drive whole matches through the scripted collaborators.

use fairdice_core::{
    crypto::verify,
    engine::{run_match, RecordingSink, RoundEngine, ScriptedCommitter, ScriptedInput},
    protocol::{ExchangePurpose, InputRequest, MatchEvent, MatchOutcome, Party},
    Die, DieSet, MatchEnd, RandomCommitter,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn scenario_dice() -> DieSet {
    DieSet::parse(["2,2,4,4,9,9", "1,1,6,6,8,8", "3,3,5,5,7,7"]).unwrap()
}

/// Forced move order 0, user picks die 0, every contribution 0
#[test]
fn test_zero_contributions_expose_secret_values() {
    // move order, then (opponent, user) per round
    let secrets = [0, 3, 5, 2, 1, 4, 4];
    let mut engine = RoundEngine::new(ScriptedCommitter::new(secrets, [2]));
    let mut input = ScriptedInput::new(["0", "0", "0", "0", "0", "0", "0", "0"]);
    let mut sink = RecordingSink::new();

    let end = run_match(&mut engine, scenario_dice(), &mut input, &mut sink).unwrap();

    let revealed = sink.revealed();
    assert_eq!(revealed.len(), 7);
    for (result, secret) in revealed.iter().zip(secrets) {
        assert_eq!(result.contribution, 0);
        assert_eq!(result.secret_value, secret);
        assert_eq!(result.combined_outcome, secret % result.modulus);
        assert!(result.commitment_valid);
        assert!(result.audit());
    }
    assert_eq!(revealed[1].combined_outcome, 3);

    // user [2,2,4,4,9,9] vs opponent [3,3,5,5,7,7]
    // round 1: 9 vs 5, round 2: 2 vs 5, round 3: 9 vs 7
    let rounds: Vec<_> = sink
        .events()
        .iter()
        .filter_map(|event| match event {
            MatchEvent::RoundResolved {
                user_face,
                opponent_face,
                winner,
                ..
            } => Some((*user_face, *opponent_face, *winner)),
            _ => None,
        })
        .collect();
    assert_eq!(
        rounds,
        vec![
            (9, 5, Some(Party::User)),
            (2, 5, Some(Party::Opponent)),
            (9, 7, Some(Party::User)),
        ]
    );

    match end {
        MatchEnd::Completed { outcome, scores } => {
            assert_eq!(outcome, MatchOutcome::UserWins);
            assert_eq!((scores.user, scores.opponent), (2, 1));
        }
        other => panic!("unexpected end {:?}", other),
    }
}

#[test]
fn test_all_rounds_tied() {
    let dice = DieSet::new(vec![
        Die::new([5; 6]),
        Die::new([5; 6]),
        Die::new([5; 6]),
    ])
    .unwrap();
    let mut engine = RoundEngine::new(ScriptedCommitter::new([0], [1]));
    let mut input = ScriptedInput::new(["0", "0", "3", "2", "5", "1", "4", "0"]);
    let mut sink = RecordingSink::new();

    let end = run_match(&mut engine, dice, &mut input, &mut sink).unwrap();

    match end {
        MatchEnd::Completed { outcome, scores } => {
            assert_eq!(outcome, MatchOutcome::Tie);
            assert_eq!((scores.user, scores.opponent), (0, 0));
        }
        other => panic!("unexpected end {:?}", other),
    }
    let ties = sink
        .events()
        .iter()
        .filter(|event| matches!(event, MatchEvent::RoundResolved { winner: None, .. }))
        .count();
    assert_eq!(ties, 3);
}

#[test]
fn test_dice_are_always_distinct() {
    for seed in 0..50 {
        let mut engine = RoundEngine::new(RandomCommitter::with_rng(StdRng::seed_from_u64(seed)));
        let t = engine.start(DieSet::default_set()).unwrap();
        let t = engine.apply(t.state, "0".into()).unwrap();

        // whichever side moved first, pick the first die still offered
        let options = match t.state.pending_request() {
            Some(InputRequest::DieSelection { options }) => options,
            other => panic!("unexpected request {:?}", other),
        };
        let t = engine.apply(t.state, options[0].to_string().as_str().into()).unwrap();

        let user = t.state.die_index(Party::User).unwrap();
        let opponent = t.state.die_index(Party::Opponent).unwrap();
        assert_ne!(user, opponent);
    }
}

#[test]
fn test_scores_never_exceed_rounds() {
    for seed in 0..20 {
        let mut engine = RoundEngine::new(RandomCommitter::with_rng(StdRng::seed_from_u64(seed)));
        let mut t = engine.start(DieSet::default_set()).unwrap();
        let mut ties = 0;

        while let Some(request) = t.state.pending_request() {
            let line = match request {
                InputRequest::Contribution { modulus, .. } => (modulus - 1).to_string(),
                InputRequest::DieSelection { options } => options[0].to_string(),
            };
            t = engine.apply(t.state, line.as_str().into()).unwrap();
            ties += t
                .events
                .iter()
                .filter(|event| matches!(event, MatchEvent::RoundResolved { winner: None, .. }))
                .count() as u32;
        }

        let scores = t.state.scores();
        assert_eq!(t.state.ties(), ties);
        assert_eq!(scores.user + scores.opponent + ties, 3);
    }
}

#[test]
fn test_abort_before_reveal_discloses_nothing() {
    let mut engine = RoundEngine::new(RandomCommitter::with_rng(StdRng::seed_from_u64(8)));
    let mut input = ScriptedInput::new(["x"]);
    let mut sink = RecordingSink::new();

    let end = run_match(&mut engine, DieSet::default_set(), &mut input, &mut sink).unwrap();

    assert_eq!(end, MatchEnd::Aborted { round: None });
    assert!(sink.revealed().is_empty());
    assert!(!sink
        .events()
        .iter()
        .any(|event| matches!(event, MatchEvent::MoveOrderDecided { .. })));

    // the transcript holds only the published digest
    let json = serde_json::to_string(sink.events()).unwrap();
    assert!(!json.contains("\"key\""));
    assert!(!json.contains("secret_value"));
}

#[test]
fn test_abort_mid_round_after_contribution_prompt() {
    // secrets: move order 0, round 1 opponent 0, round 1 user 0
    let mut engine = RoundEngine::new(ScriptedCommitter::new([0, 0, 0], [1]));
    let mut input = ScriptedInput::new(["0", "0", "0", "x"]);
    let mut sink = RecordingSink::new();

    let end = run_match(&mut engine, scenario_dice(), &mut input, &mut sink).unwrap();

    assert_eq!(end, MatchEnd::Aborted { round: Some(1) });
    // move order and the opponent roll were revealed, the user roll was not
    let revealed: Vec<_> = sink
        .events()
        .iter()
        .filter_map(|event| match event {
            MatchEvent::ExchangeRevealed { purpose, .. } => Some(*purpose),
            _ => None,
        })
        .collect();
    assert_eq!(
        revealed,
        vec![
            ExchangePurpose::MoveOrder,
            ExchangePurpose::Roll {
                round: 1,
                party: Party::Opponent
            },
        ]
    );
    assert!(!sink
        .events()
        .iter()
        .any(|event| matches!(event, MatchEvent::RoundResolved { .. })));
}

#[test]
fn test_invalid_inputs_are_retried_in_place() {
    let mut engine = RoundEngine::new(ScriptedCommitter::new([0, 0, 0], [1]));
    let mut input = ScriptedInput::new(["7", "zero", "0", "9", "0", "6", "0"]);
    let mut sink = RecordingSink::new();

    run_match(&mut engine, scenario_dice(), &mut input, &mut sink).unwrap();

    let rejected = sink
        .events()
        .iter()
        .filter(|event| matches!(event, MatchEvent::InputRejected { .. }))
        .count();
    assert_eq!(rejected, 4);

    // one commitment per exchange despite the retries
    let published = sink
        .events()
        .iter()
        .filter(|event| matches!(event, MatchEvent::CommitmentPublished { .. }))
        .count();
    assert_eq!(published, 3);

    // every contribution prompt for the move order showed the same digest
    let move_order_digests: Vec<_> = input
        .requests()
        .iter()
        .filter_map(|request| match request {
            InputRequest::Contribution {
                purpose: ExchangePurpose::MoveOrder,
                commitment,
                ..
            } => Some(*commitment),
            _ => None,
        })
        .collect();
    assert_eq!(move_order_digests.len(), 3);
    assert!(move_order_digests.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_transcript_is_independently_verifiable() {
    let mut engine = RoundEngine::new(RandomCommitter::new());
    let mut input = ScriptedInput::new(["1", "0", "2", "5", "0", "1", "4", "3"]);
    let mut sink = RecordingSink::new();

    run_match(&mut engine, DieSet::default_set(), &mut input, &mut sink).unwrap();

    // every published digest is opened by the matching reveal
    let mut published = Vec::new();
    for event in sink.events() {
        match event {
            MatchEvent::CommitmentPublished {
                purpose,
                commitment,
                ..
            } => published.push((*purpose, *commitment)),
            MatchEvent::ExchangeRevealed { purpose, result } => {
                let (p, c) = published
                    .iter()
                    .find(|(p, _)| p == purpose)
                    .copied()
                    .unwrap();
                assert_eq!(p, *purpose);
                assert_eq!(c, result.commitment);
                assert!(verify(&result.key, result.secret_value, &c));
            }
            MatchEvent::FairnessViolation { .. } => panic!("honest committer flagged"),
            _ => {}
        }
    }
}
