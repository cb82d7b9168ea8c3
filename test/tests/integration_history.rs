use std::sync::Arc;

use netlist_client::{ClientConfig, NoopListener};
use netlist_server::{ObjectListTransmitter, ReferenceMode, ServerConfig, TransmitAll};
use netlist_shared::{FrameError, ReplicationError, MIN_HISTORY_CAPACITY};
use netlist_test::{connect, deliver, registry, tick_and_exchange, LocalSocketPair, Player};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn acknowledged_server(history_capacity: usize) -> ObjectListTransmitter {
    let config = ServerConfig {
        history_capacity,
        reference_mode: ReferenceMode::LastAcknowledged,
        ..Default::default()
    };
    ObjectListTransmitter::new(Arc::new(registry().unwrap()), config).unwrap()
}

#[test]
fn history_capacity_below_minimum_is_rejected() {
    let config = ServerConfig {
        history_capacity: MIN_HISTORY_CAPACITY - 1,
        ..Default::default()
    };
    let result = ObjectListTransmitter::new(Arc::new(registry().unwrap()), config);
    assert!(matches!(
        result,
        Err(ReplicationError::HistoryCapacity { capacity: 1, minimum: 2 })
    ));
}

#[test]
fn history_keeps_only_capacity_frame_lists() {
    init_logging();
    let mut server = acknowledged_server(3);
    let key = server.create_transmitter(Box::new(TransmitAll));

    for _ in 0..5 {
        server.create_frames_for_transmitters().unwrap();
    }

    let history = server.transmitter(&key).unwrap().history();
    assert_eq!(history.len(), 3);
    let sequences: Vec<u16> = history.iter().map(|frame_list| frame_list.sequence()).collect();
    assert_eq!(sequences, vec![2, 3, 4]);
}

#[test]
fn deltas_use_last_acknowledged_frame_list() {
    init_logging();
    let mut server = acknowledged_server(4);
    let list_id = server.create_list("players").unwrap();
    let handle = server.create_object(list_id, Player::named("hank")).unwrap();
    let socket = LocalSocketPair::new();

    let mut connection = connect(
        &mut server,
        &socket,
        Box::new(TransmitAll),
        Arc::new(registry().unwrap()),
        ClientConfig::default(),
        Box::new(NoopListener),
    )
    .unwrap();

    // nothing acknowledged yet
    server.create_frames_for_transmitters().unwrap();
    let first = server.serialize_current_frame_list(&connection.key).unwrap();
    assert_eq!(first.reference, None);
    connection.receiver.deserialize_frame_list(&first).unwrap();
    connection.receiver.apply_current_frame().unwrap();
    server.acknowledge(&connection.key, first.sequence);
    assert_eq!(server.transmitter(&connection.key).unwrap().last_acknowledged(), Some(0));

    // the second frame list is never acknowledged
    server
        .object_mut(list_id, &handle)
        .and_then(|object| object.instance_mut::<Player>())
        .unwrap()
        .health = 80;
    server.create_frames_for_transmitters().unwrap();
    let second = server.serialize_current_frame_list(&connection.key).unwrap();
    assert_eq!(second.reference, Some(0));
    connection.receiver.deserialize_frame_list(&second).unwrap();
    connection.receiver.apply_current_frame().unwrap();

    server
        .object_mut(list_id, &handle)
        .and_then(|object| object.instance_mut::<Player>())
        .unwrap()
        .health = 60;
    server.create_frames_for_transmitters().unwrap();
    let third = server.serialize_current_frame_list(&connection.key).unwrap();
    assert_eq!(third.reference, Some(0));
    connection.receiver.deserialize_frame_list(&third).unwrap();
    connection.receiver.apply_current_frame().unwrap();

    let player = connection
        .receiver
        .object(list_id, &handle)
        .and_then(|object| object.instance::<Player>())
        .unwrap();
    assert_eq!(player.health, 60);

    // older acknowledgements are ignored
    server.acknowledge(&connection.key, second.sequence);
    server.acknowledge(&connection.key, first.sequence);
    assert_eq!(server.transmitter(&connection.key).unwrap().last_acknowledged(), Some(1));
}

#[test]
fn evicted_acknowledgement_falls_back_to_full_updates() {
    init_logging();
    let mut server = acknowledged_server(MIN_HISTORY_CAPACITY);
    let list_id = server.create_list("players").unwrap();
    let handle = server.create_object(list_id, Player::named("iris")).unwrap();
    let socket = LocalSocketPair::new();

    let mut connection = connect(
        &mut server,
        &socket,
        Box::new(TransmitAll),
        Arc::new(registry().unwrap()),
        ClientConfig {
            history_capacity: MIN_HISTORY_CAPACITY,
            ..Default::default()
        },
        Box::new(NoopListener),
    )
    .unwrap();

    server.create_frames_for_transmitters().unwrap();
    let first = server.serialize_current_frame_list(&connection.key).unwrap();
    connection.receiver.deserialize_frame_list(&first).unwrap();
    server.acknowledge(&connection.key, first.sequence);

    server.create_frames_for_transmitters().unwrap();
    let second = server.serialize_current_frame_list(&connection.key).unwrap();
    assert_eq!(second.reference, Some(first.sequence));
    connection.receiver.deserialize_frame_list(&second).unwrap();

    // frame list 0 would be evicted by pushing frame list 2
    server.create_frames_for_transmitters().unwrap();
    let third = server.serialize_current_frame_list(&connection.key).unwrap();
    assert_eq!(third.reference, None);
    connection.receiver.deserialize_frame_list(&third).unwrap();
    connection.receiver.apply_current_frame().unwrap();

    assert!(connection.receiver.object(list_id, &handle).is_some());
}

#[test]
fn delta_against_unknown_reference_is_rejected() {
    init_logging();
    let mut server = ObjectListTransmitter::new(Arc::new(registry().unwrap()), ServerConfig::default()).unwrap();
    let list_id = server.create_list("players").unwrap();
    server.create_object(list_id, Player::named("jack")).unwrap();
    let socket = LocalSocketPair::new();

    let mut first = connect(
        &mut server,
        &socket,
        Box::new(TransmitAll),
        Arc::new(registry().unwrap()),
        ClientConfig::default(),
        Box::new(NoopListener),
    )
    .unwrap();
    tick_and_exchange(&mut server, &socket, &mut [&mut first]).unwrap();

    server.create_frames_for_transmitters().unwrap();
    let delta = server.serialize_current_frame_list(&first.key).unwrap();
    assert_eq!(delta.reference, Some(0));

    // a receiver that never saw frame list 0
    let mut second = connect(
        &mut server,
        &socket,
        Box::new(TransmitAll),
        Arc::new(registry().unwrap()),
        ClientConfig::default(),
        Box::new(NoopListener),
    )
    .unwrap();
    let error = second.receiver.deserialize_frame_list(&delta).unwrap_err();
    assert_eq!(
        error,
        ReplicationError::from(FrameError::MissingReference { reference: Some(0) })
    );
    assert!(second.receiver.history().is_empty());

    first.receiver.deserialize_frame_list(&delta).unwrap();
    first.receiver.apply_current_frame().unwrap();

    // the newly connected destination starts from full updates
    tick_and_exchange(&mut server, &socket, &mut [&mut first, &mut second]).unwrap();
    assert_eq!(first.receiver.list(list_id).unwrap().len(), 1);
    assert_eq!(second.receiver.list(list_id).unwrap().len(), 1);
    assert_eq!(deliver(&mut server, &mut second).unwrap(), 0);
}

#[test]
fn notified_change_survives_lagging_acknowledgement() {
    init_logging();
    let mut server = acknowledged_server(4);
    let list_id = server.create_list("players").unwrap();
    let handle = server.create_object(list_id, Player::named("kate")).unwrap();
    let socket = LocalSocketPair::new();

    let mut connection = connect(
        &mut server,
        &socket,
        Box::new(TransmitAll),
        Arc::new(registry().unwrap()),
        ClientConfig::default(),
        Box::new(NoopListener),
    )
    .unwrap();

    server.create_frames_for_transmitters().unwrap();
    let first = server.serialize_current_frame_list(&connection.key).unwrap();
    connection.receiver.deserialize_frame_list(&first).unwrap();
    connection.receiver.apply_current_frame().unwrap();
    server.acknowledge(&connection.key, first.sequence);

    // flagged in a frame list whose acknowledgement never arrives
    let object = server.object_mut(list_id, &handle).unwrap();
    object.instance_mut::<Player>().unwrap().score = 7;
    object.on_change("score").unwrap();

    let receiver_score = |connection: &netlist_test::TestConnection| {
        connection
            .receiver
            .object(list_id, &handle)
            .and_then(|object| object.instance::<Player>())
            .map(|player| player.score)
    };

    server.create_frames_for_transmitters().unwrap();
    let second = server.serialize_current_frame_list(&connection.key).unwrap();
    assert_eq!(second.reference, Some(first.sequence));
    connection.receiver.deserialize_frame_list(&second).unwrap();
    connection.receiver.apply_current_frame().unwrap();
    assert_eq!(receiver_score(&connection), Some(7));

    // still encoded against frame list 0, which holds the old score
    for _ in 0..2 {
        server.create_frames_for_transmitters().unwrap();
        let next = server.serialize_current_frame_list(&connection.key).unwrap();
        assert_eq!(next.reference, Some(first.sequence));
        connection.receiver.deserialize_frame_list(&next).unwrap();
        connection.receiver.apply_current_frame().unwrap();
        assert_eq!(receiver_score(&connection), Some(7));
    }

    let server_score = server
        .object(list_id, &handle)
        .and_then(|object| object.instance::<Player>())
        .map(|player| player.score);
    assert_eq!(server_score, Some(7));
}
