//! Negotiation lifecycle through the public context API.

use super::helpers::{Coordination, agent, coordination, recorder, task};
use concord::{
    bus::domain::MessageType,
    negotiation::{
        domain::{NEGOTIATION_CONFIDENCE_THRESHOLD, NegotiationStatus, Resolver},
        services::NegotiationError,
    },
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn propose_counter_agree(coordination: Coordination) {
    let protocol = coordination.context.negotiations();

    let opened = protocol
        .open_negotiation(
            task("task-001"),
            agent("MARS"),
            agent("VENUS"),
            "auth approach",
            "use JWT",
        )
        .await
        .expect("open succeeds");
    assert_eq!(opened.status(), NegotiationStatus::Open);
    assert_eq!(opened.message_ids().len(), 1);

    let countered = protocol
        .respond_to_negotiation(opened.id(), "use sessions")
        .await
        .expect("counter succeeds");
    assert_eq!(countered.respondent_position(), Some("use sessions"));
    assert_eq!(countered.message_ids().len(), 2);

    let agreed = protocol
        .resolve(opened.id(), "use JWT with refresh", Resolver::Auto)
        .await
        .expect("resolve succeeds");
    assert_eq!(agreed.status(), NegotiationStatus::Agreed);
    assert_eq!(agreed.resolution(), Some("use JWT with refresh"));
    assert_eq!(agreed.resolved_by(), Some(&Resolver::Auto));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn exchange_is_one_bus_thread(coordination: Coordination) {
    let protocol = coordination.context.negotiations();
    let session = protocol
        .open_negotiation(
            task("task-001"),
            agent("MARS"),
            agent("VENUS"),
            "state store",
            "redux",
        )
        .await
        .expect("open succeeds");
    protocol
        .respond_to_negotiation(session.id(), "signals")
        .await
        .expect("counter succeeds");
    protocol
        .resolve(session.id(), "signals", Resolver::from(agent("MARS")))
        .await
        .expect("resolve succeeds");

    let proposal = session.proposal_id().expect("proposal recorded");
    let kinds: Vec<_> = coordination
        .context
        .bus()
        .get_thread(proposal)
        .expect("thread query")
        .iter()
        .map(concord::bus::domain::AgentMessage::kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            MessageType::Propose,
            MessageType::Counter,
            MessageType::Agree
        ]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn escalation_notifies_the_arbitrator(coordination: Coordination) {
    let (arbitrator_inbox, arbitrator) = recorder();
    let _sub = coordination
        .context
        .bus()
        .subscribe(coordination.context.config().arbitrator.clone(), arbitrator);
    let protocol = coordination.context.negotiations();
    let session = protocol
        .open_negotiation(
            task("task-001"),
            agent("MARS"),
            agent("VENUS"),
            "database",
            "postgres",
        )
        .await
        .expect("open succeeds");

    let escalated = protocol
        .escalate(session.id(), "no common ground")
        .await
        .expect("escalate succeeds");

    assert_eq!(escalated.status(), NegotiationStatus::Escalated);
    assert_eq!(escalated.escalation_reason(), Some("no common ground"));
    let received = arbitrator_inbox.lock().expect("inbox lock");
    assert_eq!(received.len(), 1);
    assert_eq!(
        received
            .first()
            .map(concord::bus::domain::AgentMessage::kind),
        Some(MessageType::Escalate)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn terminal_sessions_leave_the_open_list(coordination: Coordination) {
    let protocol = coordination.context.negotiations();
    let settled = protocol
        .open_negotiation(task("task-001"), agent("MARS"), agent("VENUS"), "a", "x")
        .await
        .expect("open succeeds");
    let pending = protocol
        .open_negotiation(task("task-001"), agent("MARS"), agent("SATURN"), "b", "y")
        .await
        .expect("open succeeds");
    protocol
        .resolve(settled.id(), "x", Resolver::Auto)
        .await
        .expect("resolve succeeds");

    let open = protocol
        .get_open_negotiations(&task("task-001"))
        .expect("open query");
    let ids: Vec<_> = open
        .iter()
        .map(concord::negotiation::domain::NegotiationSession::id)
        .collect();
    assert_eq!(ids, vec![pending.id()]);

    let late = protocol.escalate(settled.id(), "too late").await;
    assert!(matches!(
        late,
        Err(NegotiationError::AlreadyTerminal {
            status: NegotiationStatus::Agreed,
            ..
        })
    ));
}

#[rstest]
#[case(0.5, true, true)]
#[case(0.5, false, false)]
#[case(0.65, true, false)]
#[case(0.9, true, false)]
fn trigger_predicate_uses_default_threshold(
    coordination: Coordination,
    #[case] confidence: f64,
    #[case] peer_has_expertise: bool,
    #[case] expected: bool,
) {
    let protocol = coordination.context.negotiations();
    let threshold = coordination
        .context
        .config()
        .negotiation_confidence_threshold;
    assert!((threshold - NEGOTIATION_CONFIDENCE_THRESHOLD).abs() < f64::EPSILON);
    assert_eq!(
        protocol.should_trigger_negotiation(confidence, peer_has_expertise),
        expected
    );
}
