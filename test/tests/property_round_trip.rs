use std::sync::Arc;

use proptest::prelude::*;

use netlist_client::{ClientConfig, NoopListener};
use netlist_server::{ObjectListTransmitter, ServerConfig, TransmitAll};
use netlist_shared::{Message, ObjectHandle};
use netlist_test::{connect, registry, tick_and_exchange, LocalSocketPair, Player, Team};

fn team() -> impl Strategy<Value = Team> {
    prop_oneof![Just(Team::Spectator), Just(Team::Red), Just(Team::Blue)]
}

prop_compose! {
    fn player()(
        name in "[a-z]{0,12}",
        health in any::<i32>(),
        team in team(),
        origin in prop::array::uniform3(-1.0e6_f32..1.0e6),
        score in any::<u32>(),
        inventory in prop::collection::vec(any::<u16>(), 0..6),
        target_id in 0_u16..100,
        eighths in -8000_i32..8000,
    ) -> Player {
        Player {
            name,
            health,
            team,
            origin,
            score,
            inventory,
            target: ObjectHandle::new(target_id, 1),
            // exactly representable after quantization
            speed: eighths as f32 / 8.0,
        }
    }
}

proptest! {
    #[test]
    fn any_player_sequence_replicates(states in prop::collection::vec(player(), 1..5)) {
        let mut server =
            ObjectListTransmitter::new(Arc::new(registry().unwrap()), ServerConfig::default()).unwrap();
        let list_id = server.create_list("players").unwrap();
        let socket = LocalSocketPair::new();
        let handle = server.create_object(list_id, states[0].clone()).unwrap();

        let mut connection = connect(
            &mut server,
            &socket,
            Box::new(TransmitAll),
            Arc::new(registry().unwrap()),
            ClientConfig::default(),
            Box::new(NoopListener),
        )
        .unwrap();

        for state in &states {
            let object = server.object_mut(list_id, &handle).unwrap();
            *object.instance_mut::<Player>().unwrap() = state.clone();
            object.on_change("score").unwrap();
            tick_and_exchange(&mut server, &socket, &mut [&mut connection]).unwrap();

            let received = connection
                .receiver
                .object(list_id, &handle)
                .and_then(|object| object.instance::<Player>())
                .unwrap();
            prop_assert_eq!(received, state);
        }
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let _ = Message::from_bytes(&bytes);
    }
}
