mod common;

use common::{test_app, test_app_on_disk};
use wedding_game_back::{
    dao::party_store::PartyStore,
    services::{
        game_state_service, photo_service,
        voting_service::{self, VoteError, VoteOutcome},
    },
};

#[tokio::test]
async fn votes_require_an_open_voting_phase() {
    let app = test_app().await;
    let photo = photo_service::upload_photo(&app.state, "U1", b"jpeg")
        .await
        .unwrap();

    let err = voting_service::vote(&app.state, "U2", photo.id)
        .await
        .unwrap_err();
    assert!(matches!(err, VoteError::NotVotingPhase));

    game_state_service::start_voting(&app.state).await.unwrap();
    game_state_service::end_voting(&app.state).await.unwrap();
    let err = voting_service::vote(&app.state, "U2", photo.id)
        .await
        .unwrap_err();
    assert!(matches!(err, VoteError::NotVotingPhase));
}

#[tokio::test]
async fn tally_counts_each_guest_once() {
    let app = test_app().await;
    let photo = photo_service::upload_photo(&app.state, "U1", b"jpeg")
        .await
        .unwrap();
    game_state_service::start_voting(&app.state).await.unwrap();

    let first = voting_service::vote(&app.state, "U2", photo.id).await.unwrap();
    assert_eq!(
        first,
        VoteOutcome::Accepted {
            photo_id: photo.id,
            votes: 1
        }
    );

    let again = voting_service::vote(&app.state, "U2", photo.id).await.unwrap();
    assert_eq!(again, VoteOutcome::AlreadyVoted { photo_id: photo.id });

    let other = voting_service::vote(&app.state, "U3", photo.id).await.unwrap();
    assert_eq!(
        other,
        VoteOutcome::Accepted {
            photo_id: photo.id,
            votes: 2
        }
    );

    let stored = app.store.find_photo(photo.id).await.unwrap().unwrap();
    assert_eq!(stored.votes, 2);

    let updates = app.events.payloads("photo-vote-updated");
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[1]["photoId"], photo.id);
    assert_eq!(updates[1]["votes"], 2);
}

#[tokio::test]
async fn unknown_photos_are_rejected() {
    let app = test_app().await;
    game_state_service::start_voting(&app.state).await.unwrap();

    let err = voting_service::vote(&app.state, "U2", 999).await.unwrap_err();
    assert!(matches!(err, VoteError::UnknownPhoto(999)));
    assert!(app.events.payloads("photo-vote-updated").is_empty());
}

#[tokio::test]
async fn gallery_numbers_follow_upload_order() {
    let app = test_app().await;
    let mut ids = Vec::new();
    for uploader in ["U1", "U2", "U3"] {
        let photo = photo_service::upload_photo(&app.state, uploader, b"jpeg")
            .await
            .unwrap();
        ids.push(photo.id);
    }
    game_state_service::start_voting(&app.state).await.unwrap();

    let outcome = voting_service::vote_by_index(&app.state, "U9", 2)
        .await
        .unwrap();
    assert_eq!(
        outcome,
        VoteOutcome::Accepted {
            photo_id: ids[1],
            votes: 1
        }
    );

    for index in [0, 4] {
        let err = voting_service::vote_by_index(&app.state, "U9", index)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            VoteError::IndexOutOfRange { available: 3, .. }
        ));
    }
}

#[tokio::test]
async fn top_photos_are_ordered_by_tally() {
    let app = test_app().await;
    let mut ids = Vec::new();
    for uploader in ["U1", "U2", "U3"] {
        let photo = photo_service::upload_photo(&app.state, uploader, b"jpeg")
            .await
            .unwrap();
        ids.push(photo.id);
    }
    game_state_service::start_voting(&app.state).await.unwrap();

    for voter in ["V1", "V2"] {
        voting_service::vote(&app.state, voter, ids[2]).await.unwrap();
    }
    voting_service::vote(&app.state, "V1", ids[1]).await.unwrap();

    let top = voting_service::top_photos(&app.state, 10).await.unwrap();
    let order: Vec<_> = top.iter().map(|photo| (photo.id, photo.votes)).collect();
    assert_eq!(order, vec![(ids[2], 2), (ids[1], 1), (ids[0], 0)]);

    let top_one = voting_service::top_photos(&app.state, 1).await.unwrap();
    assert_eq!(top_one.len(), 1);
    assert_eq!(top_one[0].id, ids[2]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_votes_are_counted_exactly_once() {
    const VOTERS: usize = 20;

    let app = test_app_on_disk().await;
    let photo = photo_service::upload_photo(&app.state, "U1", b"jpeg")
        .await
        .unwrap();
    game_state_service::start_voting(&app.state).await.unwrap();

    let mut attempts = Vec::new();
    for voter in 0..VOTERS {
        for _ in 0..2 {
            let state = app.state.clone();
            let photo_id = photo.id;
            attempts.push(tokio::spawn(async move {
                voting_service::vote(&state, &format!("V{voter}"), photo_id).await
            }));
        }
    }

    let (mut accepted, mut duplicates) = (0, 0);
    for attempt in attempts {
        match attempt.await.unwrap().unwrap() {
            VoteOutcome::Accepted { .. } => accepted += 1,
            VoteOutcome::AlreadyVoted { .. } => duplicates += 1,
        }
    }
    assert_eq!(accepted, VOTERS);
    assert_eq!(duplicates, VOTERS);

    let stored = app.store.find_photo(photo.id).await.unwrap().unwrap();
    assert_eq!(stored.votes, VOTERS as i64);
    assert_eq!(app.events.payloads("photo-vote-updated").len(), VOTERS);
}
