//! Unit and integration tests for trk-control.

#[cfg(test)]
mod helpers {
    use std::time::Duration;

    use trk_core::Tick;
    use trk_net::MessageKind;

    use crate::{ControlConfig, LoopObserver, LoopState};

    pub fn config(interval_ms: u64) -> ControlConfig {
        ControlConfig {
            tick_interval_secs: interval_ms as f64 / 1_000.0,
            exercise_start: "08:00:00".into(),
            ..ControlConfig::default()
        }
    }

    /// Records every callback for later assertions.
    #[derive(Default)]
    pub struct Recorder {
        pub states:   Vec<(LoopState, LoopState)>,
        pub ticks:    Vec<Tick>,
        pub work:     usize,
        pub behind:   u32,
        pub messages: Vec<(MessageKind, bool)>,
        pub stopped:  Option<Tick>,
    }

    impl LoopObserver for Recorder {
        fn on_state_change(&mut self, from: LoopState, to: LoopState) {
            self.states.push((from, to));
        }
        fn on_tick_start(&mut self, tick: Tick) {
            self.ticks.push(tick);
        }
        fn on_tick_end(&mut self, _tick: Tick, work: usize) {
            self.work += work;
        }
        fn on_behind_schedule(&mut self, _tick: Tick, _overrun: Duration) {
            self.behind += 1;
        }
        fn on_message(&mut self, kind: MessageKind, handled: bool) {
            self.messages.push((kind, handled));
        }
        fn on_stopped(&mut self, final_tick: Tick) {
            self.stopped = Some(final_tick);
        }
    }
}

// ── Config ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use std::io::Write;
    use std::net::Ipv4Addr;
    use std::time::Duration;

    use trk_core::TimeOfDay;

    use crate::{ControlConfig, ControlError};

    const FULL: &str = r#"
tick_interval_secs = 0.2
exercise_start     = "08:30"

[reference]
lat         = -23.5
lng         = -46.6
declination = -21.0

[network.config]
interface = "192.168.1.10"
address   = "235.12.2.4"
port      = 1970

[network.track]
address = "235.12.2.4"
port    = 1971

[network.pilot_command]
address = "127.0.0.1"
port    = 1972

[queues]
track_capacity = 64
"#;

    #[test]
    fn parses_full_document() {
        let c = ControlConfig::from_toml_str(FULL).unwrap();
        assert_eq!(c.tick_interval(), Duration::from_millis(200));
        assert_eq!(c.start_time().unwrap(), TimeOfDay::new(8, 30, 0).unwrap());
        assert_eq!(c.reference_frame().unwrap().magnetic_declination(), -21.0);
        assert_eq!(c.queues.track_capacity, 64);

        let net = c.network.unwrap();
        assert_eq!(net.config.interface, Ipv4Addr::new(192, 168, 1, 10));
        assert!(net.config.is_multicast());
        assert_eq!(net.track.interface, Ipv4Addr::UNSPECIFIED);
        assert_eq!(net.pilot_command.port, 1972);
    }

    #[test]
    fn network_and_queues_are_optional() {
        let c = ControlConfig::from_toml_str(
            "tick_interval_secs = 1.0\n[reference]\nlat = 0.0\nlng = 0.0\n",
        )
        .unwrap();
        assert!(c.network.is_none());
        assert_eq!(c.queues.track_capacity, 1024);
        assert_eq!(c.exercise_start, "00:00:00");
    }

    #[test]
    fn rejects_bad_values() {
        let bad_interval = "tick_interval_secs = 0.0\n[reference]\nlat = 0.0\nlng = 0.0\n";
        assert!(matches!(ControlConfig::from_toml_str(bad_interval), Err(ControlError::Config(_))));

        let bad_start = "tick_interval_secs = 1.0\nexercise_start = \"25:00\"\n[reference]\nlat = 0.0\nlng = 0.0\n";
        assert!(matches!(ControlConfig::from_toml_str(bad_start), Err(ControlError::Core(_))));

        let bad_ref = "tick_interval_secs = 1.0\n[reference]\nlat = 95.0\nlng = 0.0\n";
        assert!(matches!(ControlConfig::from_toml_str(bad_ref), Err(ControlError::Core(_))));

        let unknown = "tick_interval_secs = 1.0\nspeed = 3\n[reference]\nlat = 0.0\nlng = 0.0\n";
        assert!(matches!(ControlConfig::from_toml_str(unknown), Err(ControlError::Toml(_))));
    }

    #[test]
    fn rejects_intervals_outside_duration_range() {
        for secs in ["1e20", "1.0e300", "1e-12"] {
            let text = format!("tick_interval_secs = {secs}\n[reference]\nlat = 0.0\nlng = 0.0\n");
            assert!(
                matches!(ControlConfig::from_toml_str(&text), Err(ControlError::Config(_))),
                "tick_interval_secs = {secs} must be rejected"
            );
        }
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("newton.toml");
        std::fs::File::create(&path).unwrap().write_all(FULL.as_bytes()).unwrap();
        assert!(ControlConfig::load(&path).is_ok());
        assert!(matches!(
            ControlConfig::load(&dir.path().join("missing.toml")),
            Err(ControlError::Io(_))
        ));
    }
}

// ── Pacing ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod pacing {
    use std::time::Duration;

    use crate::{Pace, pace};

    #[test]
    fn sleeps_most_of_the_remaining_interval() {
        let p = pace(Duration::from_millis(100), Duration::from_millis(20));
        assert_eq!(p, Pace::Sleep(Duration::from_millis(80).mul_f64(0.99)));
    }

    #[test]
    fn overrun_is_reported_not_slept() {
        assert_eq!(
            pace(Duration::from_millis(100), Duration::from_millis(130)),
            Pace::Behind(Duration::from_millis(30))
        );
        assert_eq!(
            pace(Duration::from_millis(100), Duration::from_millis(100)),
            Pace::Behind(Duration::ZERO)
        );
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use trk_group::LocalGroup;

    use super::helpers::config;
    use crate::{ControlConfig, ControlError, ControlLoopBuilder, IdleWorld, LoopState};

    #[test]
    fn missing_world_step() {
        let err = ControlLoopBuilder::new(config(10)).group(LocalGroup::new()).build().err().unwrap();
        assert!(matches!(err, ControlError::MissingCollaborator("world step")));
    }

    #[test]
    fn missing_group() {
        let err = ControlLoopBuilder::new(config(10)).world(IdleWorld).build().err().unwrap();
        assert!(matches!(err, ControlError::MissingCollaborator("distributed group")));
    }

    #[test]
    fn invalid_config_fails_build() {
        let bad = ControlConfig { tick_interval_secs: -1.0, ..ControlConfig::default() };
        let err = ControlLoopBuilder::new(bad)
            .world(IdleWorld)
            .group(LocalGroup::new())
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, ControlError::Config(_)));
    }

    #[test]
    fn huge_interval_fails_build_without_panicking() {
        let huge = ControlConfig { tick_interval_secs: 1e20, ..ControlConfig::default() };
        let built = ControlLoopBuilder::new(huge).world(IdleWorld).group(LocalGroup::new()).build();
        assert!(matches!(built.err(), Some(ControlError::Config(_))));
    }

    #[test]
    fn builds_idle_loop() {
        let control = ControlLoopBuilder::new(config(10))
            .world(IdleWorld)
            .group(LocalGroup::new())
            .build()
            .unwrap();
        assert_eq!(control.state(), LoopState::Idle);
        assert!(control.scheduler().is_none());
        assert_eq!(control.queues().track_out.capacity(), Some(1024));
    }
}

// ── Control loop ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod control {
    use std::time::{Duration, Instant};

    use trk_core::{Tick, TimeOfDay};
    use trk_group::{DistributedGroup, InProcessGroup, LocalGroup};
    use trk_net::{Message, MessageKind, MessageQueue, Scalar};

    use super::helpers::{Recorder, config};
    use crate::{
        ControlError, ControlLoop, ControlLoopBuilder, IdleWorld, LoopQueues, LoopState,
        NoopObserver, TickContext,
    };

    fn idle_loop(interval_ms: u64) -> ControlLoop {
        ControlLoopBuilder::new(config(interval_ms))
            .world(IdleWorld)
            .group(LocalGroup::new())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn paces_ticks_to_the_interval() {
        let mut control = idle_loop(50);
        let mut rec = Recorder::default();

        let started = Instant::now();
        control.run_ticks(10, &mut rec).await.unwrap();
        let elapsed = started.elapsed();

        assert_eq!(control.ticks(), 10);
        assert_eq!(control.state(), LoopState::Running);
        assert!(
            elapsed >= Duration::from_millis(475) && elapsed <= Duration::from_millis(525),
            "10 ticks of 50 ms took {elapsed:?}"
        );
        assert_eq!(rec.behind, 0, "cheap ticks must not fall behind");
    }

    #[tokio::test]
    async fn ticks_advance_the_clock() {
        let mut control = idle_loop(1);
        let mut rec = Recorder::default();
        control.run_ticks(3, &mut rec).await.unwrap();
        assert_eq!(rec.ticks, vec![Tick(1), Tick(2), Tick(3)]);

        // Resuming continues the same run.
        control.run_ticks(2, &mut rec).await.unwrap();
        assert_eq!(control.clock().current_tick, Tick(5));
        assert_eq!(control.clock().exercise_start, TimeOfDay::new(8, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn slow_world_step_falls_behind() {
        let world = |_: &TickContext<'_>| {
            std::thread::sleep(Duration::from_millis(15));
            Vec::new()
        };
        let mut control = ControlLoopBuilder::new(config(5))
            .world(world)
            .group(LocalGroup::new())
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        control.run_ticks(3, &mut rec).await.unwrap();
        assert_eq!(rec.behind, 3);
    }

    #[tokio::test]
    async fn terminate_stops_before_any_tick() {
        let mut control = idle_loop(10);
        control.queues().config_in.push(Message::terminate()).unwrap();

        let mut rec = Recorder::default();
        control.run(&mut rec).await.unwrap();

        assert_eq!(control.state(), LoopState::Stopped);
        assert_eq!(control.ticks(), 0);
        assert!(rec.ticks.is_empty());
        assert_eq!(rec.stopped, Some(Tick(0)));
        assert_eq!(
            rec.states,
            vec![
                (LoopState::Idle, LoopState::Running),
                (LoopState::Running, LoopState::Terminating),
                (LoopState::Terminating, LoopState::Stopped),
            ]
        );
        assert!(!control.scheduler().unwrap().running);
    }

    #[tokio::test]
    async fn terminate_mid_run_executes_no_further_ticks() {
        let queues = LoopQueues::new(16);
        let config_in = queues.config_in.clone();
        let world = move |ctx: &TickContext<'_>| {
            if ctx.tick == Tick(3) {
                config_in.push(Message::terminate()).unwrap();
            }
            Vec::new()
        };
        let mut control = ControlLoopBuilder::new(config(1))
            .world(world)
            .group(LocalGroup::new())
            .queues(queues)
            .build()
            .unwrap();

        let mut rec = Recorder::default();
        control.run(&mut rec).await.unwrap();
        assert_eq!(control.ticks(), 3);
        assert_eq!(rec.stopped, Some(Tick(3)));
    }

    #[tokio::test]
    async fn unhandled_and_unknown_kinds_only_warn() {
        let mut control = idle_loop(10);
        let q = &control.queues().config_in;
        q.push(Message::bare(MessageKind(99))).unwrap();
        q.push(Message::new(MessageKind::RATE_CHANGE, vec![Scalar::Float(2.0)])).unwrap();
        q.push(Message::bare(MessageKind::FREEZE)).unwrap();
        q.push(Message::terminate()).unwrap();

        let mut rec = Recorder::default();
        control.run(&mut rec).await.unwrap();
        assert_eq!(
            rec.messages,
            vec![
                (MessageKind(99), false),
                (MessageKind::RATE_CHANGE, false),
                (MessageKind::FREEZE, false),
                (MessageKind::TERMINATE, true),
            ]
        );
        assert_eq!(control.ticks(), 0);
    }

    #[tokio::test]
    async fn external_cancellation_interrupts_sleep() {
        let mut control = idle_loop(10_000);
        let token = control.shutdown_token();
        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            token.cancel();
        });

        let started = Instant::now();
        control.run(&mut NoopObserver).await.unwrap();
        canceller.await.unwrap();

        assert_eq!(control.state(), LoopState::Stopped);
        assert_eq!(control.ticks(), 1);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn world_output_goes_to_track_queue_in_order() {
        let world = |ctx: &TickContext<'_>| {
            vec![
                Message::new(MessageKind::TRACK_UPDATE, vec![Scalar::Int(ctx.tick.0 as i64), Scalar::Int(0)]),
                Message::new(MessageKind::TRACK_UPDATE, vec![Scalar::Int(ctx.tick.0 as i64), Scalar::Int(1)]),
            ]
        };
        let mut control = ControlLoopBuilder::new(config(1))
            .world(world)
            .group(LocalGroup::new())
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        control.run_ticks(2, &mut rec).await.unwrap();

        assert_eq!(rec.work, 4);
        let payloads: Vec<_> = control.queues().track_out.drain().into_iter().map(|m| m.payload).collect();
        assert_eq!(
            payloads,
            vec![
                vec![Scalar::Int(1), Scalar::Int(0)],
                vec![Scalar::Int(1), Scalar::Int(1)],
                vec![Scalar::Int(2), Scalar::Int(0)],
                vec![Scalar::Int(2), Scalar::Int(1)],
            ]
        );
    }

    #[tokio::test]
    async fn full_track_queue_drops_reports() {
        let world = |_: &TickContext<'_>| vec![Message::bare(MessageKind::TRACK_UPDATE); 3];
        let mut control = ControlLoopBuilder::new(config(1))
            .world(world)
            .group(LocalGroup::new())
            .queues(LoopQueues::new(4))
            .build()
            .unwrap();
        control.run_ticks(2, &mut NoopObserver).await.unwrap();
        assert_eq!(control.queues().track_out.len(), 4);
        assert_eq!(control.dropped_track_reports(), 2);
    }

    #[tokio::test]
    async fn pilot_commands_reach_the_world_step() {
        let queues = LoopQueues::new(16);
        let seen = MessageQueue::unbounded();
        let seen_in_world = seen.clone();
        let world = move |ctx: &TickContext<'_>| {
            for cmd in ctx.pilot_commands {
                seen_in_world.push(cmd.clone()).unwrap();
            }
            Vec::new()
        };
        queues.pilot_in.push(Message::new(MessageKind(50), vec![Scalar::from("TAM3054 FL350")])).unwrap();
        queues.pilot_in.push(Message::new(MessageKind(50), vec![Scalar::from("GLO1234 HDG090")])).unwrap();

        let mut control = ControlLoopBuilder::new(config(1))
            .world(world)
            .group(LocalGroup::new())
            .queues(queues)
            .build()
            .unwrap();
        control.run_ticks(2, &mut NoopObserver).await.unwrap();

        assert_eq!(seen.len(), 2);
        assert!(control.queues().pilot_in.is_empty());
    }

    #[tokio::test]
    async fn lifecycle_errors() {
        let mut control = idle_loop(1);
        assert!(matches!(
            control.stop(&mut NoopObserver).await,
            Err(ControlError::InvalidState { operation: "stop", state: LoopState::Idle })
        ));

        control.start(&mut NoopObserver).await.unwrap();
        assert!(matches!(
            control.start(&mut NoopObserver).await,
            Err(ControlError::InvalidState { operation: "start", state: LoopState::Running })
        ));

        control.queues().config_in.push(Message::terminate()).unwrap();
        control.run(&mut NoopObserver).await.unwrap();
        assert!(matches!(
            control.run(&mut NoopObserver).await,
            Err(ControlError::InvalidState { operation: "run", state: LoopState::Stopped })
        ));
    }

    #[tokio::test]
    async fn terminate_on_root_stops_the_whole_group() {
        let mut members = InProcessGroup::create(2).unwrap();
        let worker_group = members.pop().unwrap();
        let root_group = members.pop().unwrap();
        assert!(root_group.is_root());

        let mut root = ControlLoopBuilder::new(config(5))
            .world(IdleWorld)
            .group(root_group)
            .build()
            .unwrap();
        let mut worker = ControlLoopBuilder::new(config(5))
            .world(IdleWorld)
            .group(worker_group)
            .build()
            .unwrap();

        root.queues().config_in.push(Message::terminate()).unwrap();

        let mut root_obs = NoopObserver;
        let mut worker_obs = Recorder::default();
        let (a, b) = tokio::join!(root.run(&mut root_obs), worker.run(&mut worker_obs));
        a.unwrap();
        b.unwrap();

        assert_eq!(root.state(), LoopState::Stopped);
        assert_eq!(worker.state(), LoopState::Stopped);
        assert_eq!(worker_obs.messages, vec![(MessageKind::TERMINATE, true)]);
    }
}

// ── Networked loop ────────────────────────────────────────────────────────────

#[cfg(test)]
mod networked {
    use std::time::Duration;

    use tokio::net::UdpSocket;

    use trk_core::Tick;
    use trk_group::LocalGroup;
    use trk_net::{ChannelAddress, Message, MessageKind, Scalar, decode, encode};

    use super::helpers::config;

    use crate::{
        ControlConfig, ControlLoopBuilder, LoopQueues, LoopState, NetworkConfig, NoopObserver,
        TickContext,
    };

    #[tokio::test]
    async fn bridges_carry_tracks_out_and_terminate_in() {
        let track_rx = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let track_port = track_rx.local_addr().unwrap().port();

        let config = ControlConfig {
            network: Some(NetworkConfig {
                config:        ChannelAddress::localhost(0),
                track:         ChannelAddress::localhost(track_port),
                pilot_command: ChannelAddress::localhost(0),
            }),
            ..config(5)
        };
        let world = |ctx: &TickContext<'_>| {
            vec![Message::new(MessageKind::TRACK_UPDATE, vec![Scalar::Int(ctx.tick.0 as i64)])]
        };
        let mut control = ControlLoopBuilder::new(config)
            .world(world)
            .group(LocalGroup::new())
            .build()
            .unwrap();

        control.start(&mut NoopObserver).await.unwrap();
        let config_in = control.bridge_addr("config-in").unwrap();
        assert!(control.bridge_addr("track-out").is_some());

        control.run_ticks(2, &mut NoopObserver).await.unwrap();

        let mut buf = [0u8; 256];
        let len = tokio::time::timeout(Duration::from_secs(5), track_rx.recv(&mut buf))
            .await
            .unwrap()
            .unwrap();
        let first = decode(&buf[..len]).unwrap();
        assert_eq!(first.kind, MessageKind::TRACK_UPDATE);
        assert_eq!(first.payload, vec![Scalar::Int(1)]);

        let peer = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        peer.send_to(&encode(&Message::terminate()).unwrap(), config_in).await.unwrap();

        tokio::time::timeout(Duration::from_secs(5), control.run(&mut NoopObserver))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(control.state(), LoopState::Stopped);
        assert!(control.bridge_addr("config-in").is_none());
    }

    #[tokio::test]
    async fn outbound_control_is_not_dispatched_back_to_self() {
        // Unicast config channel: config-out targets the port config-in binds.
        let config_port = {
            let spare = UdpSocket::bind("127.0.0.1:0").await.unwrap();
            spare.local_addr().unwrap().port()
        };
        let config = ControlConfig {
            network: Some(NetworkConfig {
                config:        ChannelAddress::localhost(config_port),
                track:         ChannelAddress::localhost(0),
                pilot_command: ChannelAddress::localhost(0),
            }),
            ..config(5)
        };

        let queues = LoopQueues::new(16);
        let config_out = queues.config_out.clone();
        let world = move |ctx: &TickContext<'_>| {
            if ctx.tick == Tick(1) {
                config_out.push(Message::terminate()).unwrap();
            }
            Vec::new()
        };
        let mut control = ControlLoopBuilder::new(config)
            .world(world)
            .group(LocalGroup::new())
            .queues(queues)
            .build()
            .unwrap();

        control.run_ticks(40, &mut NoopObserver).await.unwrap();
        assert_eq!(control.state(), LoopState::Running, "own Terminate must not stop the loop");
        assert_eq!(control.ticks(), 40);

        control.shutdown_token().cancel();
        control.run(&mut NoopObserver).await.unwrap();

        let stats = |name: &str| {
            control
                .bridge_stats()
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, s)| *s)
                .unwrap()
        };
        assert_eq!(stats("config-out").frames, 1);
        assert_eq!(stats("config-in").frames, 0);
        assert_eq!(stats("config-in").dropped, 0);
    }
}
