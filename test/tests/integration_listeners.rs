use std::sync::{Arc, Mutex};

use netlist_client::{ClientConfig, ReceiverListener};
use netlist_server::{ObjectListTransmitter, ServerConfig, TransmitAll};
use netlist_shared::{ListId, NetworkObjectList, ObjectHandle};
use netlist_test::{
    connect, registry, tick_and_exchange, Event, FilterListener, LocalSocketPair, Player, Point,
    RecordingListener, TestConnection,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn server() -> ObjectListTransmitter {
    ObjectListTransmitter::new(Arc::new(registry().unwrap()), ServerConfig::default()).unwrap()
}

#[test]
fn receiver_callbacks_follow_frame_order() {
    init_logging();
    let mut server = server();
    let players = server.create_list("players").unwrap();
    let props = server.create_list("props").unwrap();
    let socket = LocalSocketPair::new();
    let recorder = RecordingListener::new();

    let kim = server.create_object(players, Player::named("kim")).unwrap();
    let crate_point = server.create_object(props, Point::new(4.0, 4.0)).unwrap();

    let mut connection = connect(
        &mut server,
        &socket,
        Box::new(TransmitAll),
        Arc::new(registry().unwrap()),
        ClientConfig::default(),
        Box::new(recorder.clone()),
    )
    .unwrap();
    tick_and_exchange(&mut server, &socket, &mut [&mut connection]).unwrap();

    assert_eq!(
        recorder.take(),
        vec![
            Event::BeginList("players".to_string()),
            Event::Created(kim),
            Event::BeginUpdate(kim),
            Event::EndUpdate(kim),
            Event::EndList("players".to_string()),
            Event::BeginList("props".to_string()),
            Event::Created(crate_point),
            Event::BeginUpdate(crate_point),
            Event::EndUpdate(crate_point),
            Event::EndList("props".to_string()),
        ]
    );

    // destroys are reported before the list's updates
    server.destroy_object(players, &kim).unwrap();
    let lee = server.create_object(players, Player::named("lee")).unwrap();
    tick_and_exchange(&mut server, &socket, &mut [&mut connection]).unwrap();

    assert_eq!(
        recorder.take(),
        vec![
            Event::BeginList("players".to_string()),
            Event::Destroyed(kim),
            Event::Created(lee),
            Event::BeginUpdate(lee),
            Event::EndUpdate(lee),
            Event::EndList("players".to_string()),
            Event::BeginList("props".to_string()),
            Event::BeginUpdate(crate_point),
            Event::EndUpdate(crate_point),
            Event::EndList("props".to_string()),
        ]
    );
}

#[test]
fn filtered_objects_are_omitted_not_destroyed() {
    init_logging();
    let mut server = server();
    let list_id = server.create_list("players").unwrap();
    let socket = LocalSocketPair::new();
    let filter = FilterListener::new();
    let recorder = RecordingListener::new();

    let visible = server.create_object(list_id, Player::named("mia")).unwrap();
    let hidden = server.create_object(list_id, Player::named("ned")).unwrap();
    filter.hide(hidden);

    let mut connection = connect(
        &mut server,
        &socket,
        Box::new(filter.clone()),
        Arc::new(registry().unwrap()),
        ClientConfig::default(),
        Box::new(recorder.clone()),
    )
    .unwrap();
    tick_and_exchange(&mut server, &socket, &mut [&mut connection]).unwrap();

    assert!(connection.receiver.object(list_id, &visible).is_some());
    assert!(connection.receiver.object(list_id, &hidden).is_none());
    assert!(!server.transmitter(&connection.key).unwrap().knows_object(list_id, &hidden));

    // a destroy notice goes only to destinations that were sent the object
    server.destroy_object(list_id, &hidden).unwrap();
    recorder.take();
    tick_and_exchange(&mut server, &socket, &mut [&mut connection]).unwrap();
    assert!(!recorder.take().contains(&Event::Destroyed(hidden)));

    // hiding a known object leaves it alive on the receiver
    filter.hide(visible);
    tick_and_exchange(&mut server, &socket, &mut [&mut connection]).unwrap();
    assert!(connection.receiver.object(list_id, &visible).is_some());
    assert!(server.transmitter(&connection.key).unwrap().knows_object(list_id, &visible));

    // shown again, it is resent in full and applied to the existing object
    server
        .object_mut(list_id, &visible)
        .and_then(|object| object.instance_mut::<Player>())
        .unwrap()
        .health = 1;
    filter.show(&visible);
    tick_and_exchange(&mut server, &socket, &mut [&mut connection]).unwrap();
    let mia = connection
        .receiver
        .object(list_id, &visible)
        .and_then(|object| object.instance::<Player>())
        .unwrap();
    assert_eq!(mia.health, 1);
    assert!(!recorder.take().contains(&Event::Created(visible)));
}

#[test]
fn paused_destinations_skip_frames() {
    init_logging();
    let mut server = server();
    let list_id = server.create_list("players").unwrap();
    let socket = LocalSocketPair::new();
    let filter = FilterListener::new();

    let handle = server.create_object(list_id, Player::named("olive")).unwrap();
    let mut paused = connect(
        &mut server,
        &socket,
        Box::new(filter.clone()),
        Arc::new(registry().unwrap()),
        ClientConfig::default(),
        Box::new(RecordingListener::new()),
    )
    .unwrap();
    let mut active = connect(
        &mut server,
        &socket,
        Box::new(TransmitAll),
        Arc::new(registry().unwrap()),
        ClientConfig::default(),
        Box::new(RecordingListener::new()),
    )
    .unwrap();

    filter.set_paused(true);
    server.create_frames_for_transmitters().unwrap();
    server.send_current_frame_lists(&socket).unwrap();
    assert_eq!(paused.inbox.pending(), 0);
    assert_eq!(active.inbox.pending(), 1);
    assert!(server.transmitter(&paused.key).unwrap().history().is_empty());
    assert!(filter.processed_lists().is_empty());

    filter.set_paused(false);
    tick_and_exchange(&mut server, &socket, &mut [&mut paused, &mut active]).unwrap();
    assert_eq!(filter.processed_lists(), vec!["players".to_string()]);
    assert!(paused.receiver.object(list_id, &handle).is_some());
    assert!(active.receiver.object(list_id, &handle).is_some());
}

#[test]
fn destroyed_transmitters_stop_receiving() {
    init_logging();
    let mut server = server();
    let list_id = server.create_list("players").unwrap();
    let socket = LocalSocketPair::new();
    server.create_object(list_id, Point::default()).unwrap();

    let mut connection = connect(
        &mut server,
        &socket,
        Box::new(TransmitAll),
        Arc::new(registry().unwrap()),
        ClientConfig::default(),
        Box::new(RecordingListener::new()),
    )
    .unwrap();
    tick_and_exchange(&mut server, &socket, &mut [&mut connection]).unwrap();

    assert!(server.destroy_transmitter(&connection.key));
    assert!(!server.destroy_transmitter(&connection.key));
    assert!(server.transmitter(&connection.key).is_none());
    assert_eq!(server.transmitter_keys().count(), 0);

    server.create_frames_for_transmitters().unwrap();
    assert!(server.write_current_frame_list(&connection.key).is_none());
    assert!(socket.disconnect(&connection.key));
}

fn player<'a>(
    connection: &'a TestConnection,
    list_id: ListId,
    handle: &ObjectHandle,
) -> Option<&'a Player> {
    connection
        .receiver
        .object(list_id, handle)
        .and_then(|object| object.instance::<Player>())
}

fn paused_connection(
    server: &mut ObjectListTransmitter,
    socket: &LocalSocketPair,
    filter: &FilterListener,
    recorder: &RecordingListener,
) -> TestConnection {
    connect(
        server,
        socket,
        Box::new(filter.clone()),
        Arc::new(registry().unwrap()),
        ClientConfig::default(),
        Box::new(recorder.clone()),
    )
    .unwrap()
}

#[test]
fn destroy_while_paused_is_sent_on_resume() {
    init_logging();
    let mut server = server();
    let list_id = server.create_list("players").unwrap();
    let socket = LocalSocketPair::new();
    let filter = FilterListener::new();
    let recorder = RecordingListener::new();

    let pia = server.create_object(list_id, Player::named("pia")).unwrap();
    let mut connection = paused_connection(&mut server, &socket, &filter, &recorder);
    tick_and_exchange(&mut server, &socket, &mut [&mut connection]).unwrap();
    assert!(player(&connection, list_id, &pia).is_some());

    filter.set_paused(true);
    server.destroy_object(list_id, &pia).unwrap();
    tick_and_exchange(&mut server, &socket, &mut [&mut connection]).unwrap();
    assert!(server.object(list_id, &pia).is_none());

    filter.set_paused(false);
    recorder.take();
    tick_and_exchange(&mut server, &socket, &mut [&mut connection]).unwrap();
    assert!(recorder.take().contains(&Event::Destroyed(pia)));
    assert!(player(&connection, list_id, &pia).is_none());
    assert!(!server.transmitter(&connection.key).unwrap().knows_object(list_id, &pia));

    // the freed id goes to a new object without upsetting the receiver
    let quinn = server.create_object(list_id, Player::named("quinn")).unwrap();
    assert_eq!(quinn.id(), pia.id());
    tick_and_exchange(&mut server, &socket, &mut [&mut connection]).unwrap();
    assert_eq!(player(&connection, list_id, &quinn).unwrap().name, "quinn");
}

#[test]
fn id_reused_while_paused_waits_for_destroy_notice() {
    init_logging();
    let mut server = server();
    let list_id = server.create_list("players").unwrap();
    let socket = LocalSocketPair::new();
    let filter = FilterListener::new();
    let recorder = RecordingListener::new();

    let rex = server.create_object(list_id, Player::named("rex")).unwrap();
    let mut connection = paused_connection(&mut server, &socket, &filter, &recorder);
    tick_and_exchange(&mut server, &socket, &mut [&mut connection]).unwrap();

    filter.set_paused(true);
    server.destroy_object(list_id, &rex).unwrap();
    tick_and_exchange(&mut server, &socket, &mut [&mut connection]).unwrap();
    let sal = server.create_object(list_id, Player::named("sal")).unwrap();
    assert_eq!(sal.id(), rex.id());
    assert_ne!(sal, rex);

    filter.set_paused(false);
    recorder.take();
    tick_and_exchange(&mut server, &socket, &mut [&mut connection]).unwrap();
    assert_eq!(
        recorder.take(),
        vec![
            Event::BeginList("players".to_string()),
            Event::Destroyed(rex),
            Event::EndList("players".to_string()),
        ]
    );
    assert!(player(&connection, list_id, &sal).is_none());

    tick_and_exchange(&mut server, &socket, &mut [&mut connection]).unwrap();
    assert!(recorder.take().contains(&Event::Created(sal)));
    assert_eq!(player(&connection, list_id, &sal).unwrap().name, "sal");
}

#[test]
fn change_flagged_while_paused_is_sent_on_resume() {
    init_logging();
    let mut server = server();
    let list_id = server.create_list("players").unwrap();
    let socket = LocalSocketPair::new();
    let filter = FilterListener::new();
    let recorder = RecordingListener::new();

    let tess = server.create_object(list_id, Player::named("tess")).unwrap();
    let mut connection = paused_connection(&mut server, &socket, &filter, &recorder);
    tick_and_exchange(&mut server, &socket, &mut [&mut connection]).unwrap();

    filter.set_paused(true);
    let object = server.object_mut(list_id, &tess).unwrap();
    object.instance_mut::<Player>().unwrap().score = 12;
    object.on_change("score").unwrap();
    tick_and_exchange(&mut server, &socket, &mut [&mut connection]).unwrap();
    assert_eq!(player(&connection, list_id, &tess).unwrap().score, 0);

    filter.set_paused(false);
    tick_and_exchange(&mut server, &socket, &mut [&mut connection]).unwrap();
    assert_eq!(player(&connection, list_id, &tess).unwrap().score, 12);

    // later frames keep the value without a new notification
    tick_and_exchange(&mut server, &socket, &mut [&mut connection]).unwrap();
    assert_eq!(player(&connection, list_id, &tess).unwrap().score, 12);
}

#[test]
fn change_flagged_while_hidden_is_sent_when_shown() {
    init_logging();
    let mut server = server();
    let list_id = server.create_list("players").unwrap();
    let socket = LocalSocketPair::new();
    let filter = FilterListener::new();
    let recorder = RecordingListener::new();

    let uma = server.create_object(list_id, Player::named("uma")).unwrap();
    let mut connection = paused_connection(&mut server, &socket, &filter, &recorder);
    tick_and_exchange(&mut server, &socket, &mut [&mut connection]).unwrap();

    filter.hide(uma);
    let object = server.object_mut(list_id, &uma).unwrap();
    object.instance_mut::<Player>().unwrap().score = 5;
    object.on_change("score").unwrap();
    tick_and_exchange(&mut server, &socket, &mut [&mut connection]).unwrap();

    filter.show(&uma);
    tick_and_exchange(&mut server, &socket, &mut [&mut connection]).unwrap();
    assert_eq!(player(&connection, list_id, &uma).unwrap().score, 5);
}

/// Records how many objects each list holds when its processing ends
#[derive(Clone, Default)]
struct ListSizes {
    sizes: Arc<Mutex<Vec<(String, usize)>>>,
}

impl ReceiverListener for ListSizes {
    fn on_end_process_list(&mut self, list: &NetworkObjectList) {
        if let Ok(mut sizes) = self.sizes.lock() {
            sizes.push((list.name().to_string(), list.len()));
        }
    }
}

#[test]
fn destroyed_objects_are_swept_after_the_whole_frame_list() {
    init_logging();
    let mut server = server();
    let players = server.create_list("players").unwrap();
    let props = server.create_list("props").unwrap();
    let socket = LocalSocketPair::new();
    let sizes = ListSizes::default();

    let vic = server.create_object(players, Player::named("vic")).unwrap();
    server.create_object(props, Point::new(1.0, 2.0)).unwrap();

    let mut connection = connect(
        &mut server,
        &socket,
        Box::new(TransmitAll),
        Arc::new(registry().unwrap()),
        ClientConfig::default(),
        Box::new(sizes.clone()),
    )
    .unwrap();
    tick_and_exchange(&mut server, &socket, &mut [&mut connection]).unwrap();

    server.destroy_object(players, &vic).unwrap();
    tick_and_exchange(&mut server, &socket, &mut [&mut connection]).unwrap();

    // still counted when its list ends, gone once the frame list is applied
    let recorded = sizes.sizes.lock().unwrap().clone();
    assert_eq!(
        recorded[2..].to_vec(),
        vec![("players".to_string(), 1), ("props".to_string(), 1)]
    );
    assert!(player(&connection, players, &vic).is_none());
    assert!(connection.receiver.list(players).unwrap().is_empty());
}
