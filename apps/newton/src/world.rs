//! Position-report world step.
//!
//! Each pilot command carries a coordinate record as its payload:
//! `[kind code, field_a, field_b?, field_c?, field_d?]`.  The step resolves
//! it against the fix table and emits one track update per resolved command:
//! `[tick, x_m, y_m, lat, lng]` in the local tangent frame.

use tracing::warn;

use trk_coords::{CoordinateEngine, CoordinateRecord};
use trk_net::{Message, MessageKind, Scalar};
use trk_control::{TickContext, WorldStep};

pub struct PositionReports {
    engine:   CoordinateEngine,
    rejected: u64,
}

impl PositionReports {
    pub fn new(engine: CoordinateEngine) -> Self {
        Self { engine, rejected: 0 }
    }

    fn report(&self, ctx: &TickContext<'_>, command: &Message) -> Option<Message> {
        let record = command_record(command)?;
        let resolved = self.engine.resolve_record(&record);
        let point = resolved.position()?;
        let p = self.engine.to_cartesian(point);
        Some(Message::new(
            MessageKind::TRACK_UPDATE,
            vec![
                Scalar::Int(ctx.tick.0 as i64),
                Scalar::Float(p.x),
                Scalar::Float(p.y),
                Scalar::Float(point.lat),
                Scalar::Float(point.lng),
            ],
        ))
    }
}

impl WorldStep for PositionReports {
    fn step(&mut self, ctx: &TickContext<'_>) -> Vec<Message> {
        let mut out = Vec::with_capacity(ctx.pilot_commands.len());
        for command in ctx.pilot_commands {
            match self.report(ctx, command) {
                Some(m) => out.push(m),
                None => {
                    self.rejected += 1;
                    warn!(
                        tick = %ctx.tick,
                        kind = %command.kind,
                        rejected = self.rejected,
                        "pilot command has no resolvable position"
                    );
                }
            }
        }
        out
    }
}

/// Rebuild a [`CoordinateRecord`] from a command payload.
fn command_record(command: &Message) -> Option<CoordinateRecord> {
    let mut fields = command.payload.iter().map(field_text);
    let kind = single_char(&fields.next()?)?;
    let mut record = CoordinateRecord::new(kind, fields.next()?);
    if let Some(b) = fields.next() {
        record = record.with_b(b);
    }
    if let Some(c) = fields.next() {
        record = record.with_c(c);
    }
    if let Some(d) = fields.next() {
        record = record.with_d(d);
    }
    Some(record)
}

fn field_text(s: &Scalar) -> String {
    match s {
        Scalar::Int(i) => i.to_string(),
        Scalar::Float(f) => f.to_string(),
        Scalar::Text(t) => t.clone(),
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.trim().chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use trk_core::{FixId, ReferenceFrame, SimClock, Tick, TimeOfDay};
    use trk_coords::{Fix, FixRegistry};
    use trk_group::LocalGroup;

    use super::*;

    fn world() -> PositionReports {
        let frame = ReferenceFrame::new(-23.5, -46.6, 0.0).unwrap();
        let fixes = FixRegistry::from_fixes([Fix::new(FixId(7), "SBGR", -23.435, -46.473)]).unwrap();
        PositionReports::new(CoordinateEngine::new(Arc::new(frame), Arc::new(fixes)))
    }

    #[test]
    fn resolves_commands_and_counts_rejects() {
        let mut world = world();
        let mut clock = SimClock::new(TimeOfDay::new(8, 0, 0).unwrap(), Duration::from_secs(1)).unwrap();
        clock.advance();
        let group = LocalGroup::new();
        let commands = vec![
            Message::new(MessageKind(50), vec![Scalar::from("I"), Scalar::from("sbgr")]),
            Message::new(MessageKind(50), vec![Scalar::from("F"), Scalar::Int(7)]),
            Message::new(MessageKind(50), vec![Scalar::from("I"), Scalar::from("XXXX")]),
            Message::new(MessageKind(50), vec![]),
        ];
        let ctx = TickContext { tick: Tick(1), clock: &clock, pilot_commands: &commands, group: &group };

        let out = world.step(&ctx);
        assert_eq!(out.len(), 2);
        assert_eq!(world.rejected, 2);
        assert_eq!(out[0].kind, MessageKind::TRACK_UPDATE);
        assert_eq!(out[0].payload[0], Scalar::Int(1));
        assert_eq!(out[0].payload, out[1].payload);
    }

    #[test]
    fn numeric_fields_become_text() {
        let m = Message::new(
            MessageKind(50),
            vec![Scalar::from("L"), Scalar::Float(-23.5), Scalar::Float(-46.25)],
        );
        let record = command_record(&m).unwrap();
        assert_eq!(record.kind, 'L');
        assert_eq!(record.field_a, "-23.5");
        assert_eq!(record.field_b.as_deref(), Some("-46.25"));
        let two_chars = Message::new(MessageKind(50), vec![Scalar::from("DX"), Scalar::from("1")]);
        assert!(command_record(&two_chars).is_none());
    }
}
