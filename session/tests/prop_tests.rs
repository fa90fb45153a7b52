//! Property tests for session invariants.

use ballot_nullables::{NullAdmin, NullSink};
use ballot_session::{KeepEarliest, Proposal, SessionWorkflow, TallyEngine};
use ballot_types::{Phase, ProposalId, VoterAddress};
use proptest::prelude::*;

fn chair() -> VoterAddress {
    VoterAddress::new("chair")
}

fn voter(i: usize) -> VoterAddress {
    VoterAddress::new(format!("voter-{i}"))
}

/// A session at `VotingOpen` with `voters` seed voters and `proposals`
/// proposals (all submitted by voter 0).
fn session_at_voting(voters: usize, proposals: usize) -> SessionWorkflow {
    let mut session = SessionWorkflow::seeded(
        Box::new(NullAdmin::allow_all()),
        Box::new(NullSink),
        (0..voters).map(voter),
    );
    let admin = chair();
    session.open_proposals(&admin).unwrap();
    for i in 0..proposals {
        session
            .add_proposal(&voter(0), format!("proposal {i}"))
            .unwrap();
    }
    session.close_proposals(&admin).unwrap();
    session.open_voting(&admin).unwrap();
    session
}

/// A voting-phase action, possibly invalid; invalid actions must fail
/// without disturbing any invariant.
#[derive(Clone, Debug)]
enum Action {
    Cast { voter: usize, proposal: u32 },
    Change { voter: usize, proposal: u32 },
    Unregister(usize),
    Register(usize),
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0usize..8, 0u32..10).prop_map(|(voter, proposal)| Action::Cast { voter, proposal }),
        (0usize..8, 0u32..10).prop_map(|(voter, proposal)| Action::Change { voter, proposal }),
        (0usize..8).prop_map(Action::Unregister),
        (0usize..8).prop_map(Action::Register),
    ]
}

proptest! {
    /// sum(vote_count) == number of voters holding a counted vote, across
    /// arbitrary interleavings of cast/change/unregister/register.
    #[test]
    fn vote_totals_match_counted_votes(
        voters in 1usize..8,
        proposals in 1usize..6,
        actions in prop::collection::vec(arb_action(), 0..40),
    ) {
        let mut session = session_at_voting(voters, proposals);
        let admin = chair();

        for action in actions {
            match action {
                Action::Cast { voter: v, proposal } => {
                    let _ = session.cast_vote(&voter(v % voters), ProposalId::new(proposal));
                }
                Action::Change { voter: v, proposal } => {
                    let _ = session.change_vote(&voter(v % voters), ProposalId::new(proposal));
                }
                Action::Unregister(v) => {
                    let _ = session.unregister_voter(&admin, &voter(v % voters));
                }
                Action::Register(v) => {
                    let _ = session.register_voter(&admin, &voter(v % voters));
                }
            }

            let total: u32 = session.proposals().iter().map(|p| p.vote_count).sum();
            let counted = (0..voters)
                .filter(|&v| session.voter(&voter(v)).unwrap().has_voted())
                .count() as u32;
            prop_assert_eq!(total, counted);
        }
    }

    /// Every counted vote points at an existing proposal.
    #[test]
    fn counted_votes_point_at_real_proposals(
        voters in 1usize..8,
        proposals in 1usize..6,
        actions in prop::collection::vec(arb_action(), 0..40),
    ) {
        let mut session = session_at_voting(voters, proposals);
        let admin = chair();

        for action in actions {
            match action {
                Action::Cast { voter: v, proposal } => {
                    let _ = session.cast_vote(&voter(v % voters), ProposalId::new(proposal));
                }
                Action::Change { voter: v, proposal } => {
                    let _ = session.change_vote(&voter(v % voters), ProposalId::new(proposal));
                }
                Action::Unregister(v) => {
                    let _ = session.unregister_voter(&admin, &voter(v % voters));
                }
                Action::Register(v) => {
                    let _ = session.register_voter(&admin, &voter(v % voters));
                }
            }
        }

        for v in 0..voters {
            if let Some(id) = session.voter(&voter(v)).unwrap().voted_for {
                prop_assert!(session.proposal(id).is_ok());
            }
        }
    }

    /// Proposal ids are dense 1..=N in submission order.
    #[test]
    fn proposal_ids_are_dense(count in 0usize..20) {
        let session = session_at_voting(1, count);
        let ids: Vec<u32> = session.proposals().iter().map(|p| p.id.as_u32()).collect();
        let expected: Vec<u32> = (1..=count as u32).collect();
        prop_assert_eq!(ids, expected);
    }

    /// The winner, when there is one, holds a maximal vote count; with the
    /// earliest-wins tie-break it is the first maximal proposal.
    #[test]
    fn winner_is_first_maximal(counts in prop::collection::vec(0u32..50, 0..12)) {
        let proposals: Vec<Proposal> = counts
            .iter()
            .enumerate()
            .map(|(i, &vote_count)| Proposal {
                id: ProposalId::new(i as u32 + 1),
                description: format!("p{i}"),
                vote_count,
            })
            .collect();

        let winner = TallyEngine::compute_winner(&proposals, &KeepEarliest, &NullSink);
        let max = counts.iter().copied().max().unwrap_or(0);
        if max == 0 {
            prop_assert!(winner.is_none());
        } else {
            let first_max = counts.iter().position(|&c| c == max).unwrap() as u32 + 1;
            prop_assert_eq!(winner.as_u32(), first_max);
        }
    }

    /// However the session is driven, the phase only ever moves to its
    /// linear successor or back to the start via restart.
    #[test]
    fn phase_moves_are_successor_or_restart(steps in prop::collection::vec(0u8..7, 0..30)) {
        let mut session = SessionWorkflow::seeded(
            Box::new(NullAdmin::allow_all()),
            Box::new(NullSink),
            [voter(0)],
        );
        let admin = chair();

        for step in steps {
            let before = session.phase();
            let _ = match step {
                0 => session.open_proposals(&admin),
                1 => session.close_proposals(&admin),
                2 => session.open_voting(&admin),
                3 => session.close_voting(&admin),
                4 => session.tally(&admin).map(|_| ()),
                5 => session.restart(&admin, ballot_session::RestartMode::RetainVoters),
                _ => session.restart(&admin, ballot_session::RestartMode::PurgeVoters),
            };
            let after = session.phase();

            let legal_move = after == before
                || before.successor() == Some(after)
                || (before == Phase::Tallied && after == Phase::RegisteringVoters);
            prop_assert!(legal_move, "illegal move {before} -> {after}");
        }
    }
}
