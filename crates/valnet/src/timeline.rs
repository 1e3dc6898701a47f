//! Turns a value-network export into a laid-out-ready [`Graph`].
//!
//! Processes sit on a horizontal timeline: each one is fixed on X at the
//! midpoint of its date span and is as wide as the span (with a minimum).
//! Resource types float freely and start at random positions. Only the
//! vertical placement of processes is left to the force layout.

use chrono::{NaiveDate, NaiveTime};
use indexmap::{IndexMap, IndexSet};
use log::{info, warn};
use rand::{Rng, SeedableRng, rngs::StdRng};

use valnet_core::{
    color::Color,
    geometry::{Point, Size},
    identifier::Id,
};

use crate::{
    config::TimelineConfig,
    graph::{EdgeStyle, Graph, Node, NodeKind},
    source::{Process, Scope, SourceError, ValueNetwork},
};

const PROCESS_HEIGHT: f32 = 40.0;
const RESOURCE_SIZE: Size = Size::new(150.0, 25.0);
/// Vertical band of the random start positions of resource types.
const RESOURCE_Y_RANGE: f32 = 500.0;
/// Vertical band of the random start positions of processes.
const PROCESS_Y_RANGE: f32 = 100.0;

/// Date span of a process in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Span {
    start: i64,
    end: i64,
}

impl Span {
    fn mid(self) -> f64 {
        (self.start as f64 + self.end as f64) / 2.0
    }
}

/// Linear mapping of epoch milliseconds onto `[0, x_scale]`.
#[derive(Debug, Clone, Copy)]
struct TimeAxis {
    min: f64,
    max: f64,
    x_scale: f64,
}

impl TimeAxis {
    fn x(self, time: f64) -> f32 {
        if self.max == self.min {
            return 0.0;
        }
        (self.x_scale * (time - self.min) / (self.max - self.min)) as f32
    }
}

/// Builds process graphs from exports.
#[derive(Debug, Clone)]
pub struct Assembler {
    timeline: TimelineConfig,
    process_color: Color,
    resource_color: Color,
}

impl Assembler {
    pub fn new(timeline: TimelineConfig) -> Self {
        Self {
            timeline,
            process_color: Color::new("#bfb").expect("valid process color"),
            resource_color: Color::new("#bbf").expect("valid resource color"),
        }
    }

    pub fn set_process_color(&mut self, color: Color) -> &mut Self {
        self.process_color = color;
        self
    }

    pub fn set_resource_color(&mut self, color: Color) -> &mut Self {
        self.resource_color = color;
        self
    }

    /// Assembles the part of `network` selected by `scope`.
    ///
    /// Resource types come first in the node order, then processes, both in
    /// export order. Edges whose far end is outside the assembled node set
    /// are skipped.
    ///
    /// # Errors
    ///
    /// Fails on an unknown scope target or an unparseable process date.
    pub fn assemble(&self, network: &ValueNetwork, scope: &Scope) -> Result<Graph, SourceError> {
        let process_ids = network.scoped_processes(scope)?;

        let mut spans: IndexMap<Id, (&Process, Span)> = IndexMap::new();
        for id in &process_ids {
            let process = &network.processes[id];
            spans.insert(*id, (process, self.span(*id, process)?));
        }

        let resource_ids = select_resource_types(network, scope, &spans);
        let axis = self.time_axis(spans.values().map(|(_, span)| *span));
        let mut rng = StdRng::seed_from_u64(self.timeline.seed());
        let mut graph = Graph::new();

        for id in &resource_ids {
            let resource = &network.resource_types[id];
            let x_scale = self.timeline.x_scale();
            let x = if x_scale.is_finite() && x_scale > 0.0 {
                rng.random_range(0.0..x_scale)
            } else {
                0.0
            };
            let y = rng.random_range(0.0..RESOURCE_Y_RANGE);

            let mut node = Node::new(*id, NodeKind::from_type_name(&resource.kind), &resource.name)
                .with_position(Point::new(x, y))
                .with_size(RESOURCE_SIZE)
                .with_color(self.resource_color);
            if let Some(url) = &resource.url {
                node = node.with_url(url);
            }
            graph.add_node(node);
        }

        for (id, (process, span)) in &spans {
            let fixed_x = axis.x(span.mid());
            let width = self.process_width(axis, *id, process)?;
            let y = rng.random_range(0.0..PROCESS_Y_RANGE);

            let mut node = Node::new(*id, NodeKind::from_type_name(&process.kind), &process.name)
                .with_position(Point::new(fixed_x, y))
                .with_size(Size::new(width, PROCESS_HEIGHT))
                .with_color(self.process_color)
                .with_fixed_x(fixed_x)
                .with_dates(format!("{}..{}", process.start, process.end));
            if let Some(url) = &process.url {
                node = node.with_url(url);
            }
            graph.add_node(node);
        }

        for (id, (process, _)) in &spans {
            for next in &process.next {
                add_edge_or_skip(&mut graph, *id, *next);
            }
        }
        for id in &resource_ids {
            for next in &network.resource_types[id].next {
                add_edge_or_skip(&mut graph, *id, *next);
            }
        }

        info!(
            scope:% = scope,
            processes = spans.len(),
            resource_types = resource_ids.len(),
            edges = graph.edges().len();
            "Process graph assembled"
        );
        Ok(graph)
    }

    /// Parsed date span; a zero-length span is widened on both sides.
    fn span(&self, id: Id, process: &Process) -> Result<Span, SourceError> {
        let start = parse_date(id, "start", &process.start)?;
        let end = parse_date(id, "end", &process.end)?;
        if start == end {
            let padding = self.timeline.instant_padding_ms();
            return Ok(Span {
                start: start - padding,
                end: end + padding,
            });
        }
        Ok(Span { start, end })
    }

    fn time_axis(&self, spans: impl Iterator<Item = Span>) -> TimeAxis {
        let (min, max) = spans.fold((i64::MAX, i64::MIN), |(min, max), span| {
            (min.min(span.start), max.max(span.end))
        });
        if min > max {
            // No processes.
            return TimeAxis {
                min: 0.0,
                max: 0.0,
                x_scale: 0.0,
            };
        }
        TimeAxis {
            min: min as f64,
            max: max as f64,
            x_scale: f64::from(self.timeline.x_scale()),
        }
    }

    /// Width from the unpadded dates, never below the configured minimum.
    fn process_width(&self, axis: TimeAxis, id: Id, process: &Process) -> Result<f32, SourceError> {
        let start = parse_date(id, "start", &process.start)? as f64;
        let end = parse_date(id, "end", &process.end)? as f64;
        let span_width = axis.x(end) - axis.x(start);
        Ok(span_width.max(self.timeline.min_process_width()))
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new(TimelineConfig::default())
    }
}

/// Resource types shown for `scope`: all of them for [`Scope::All`],
/// otherwise only those linked to a selected process.
fn select_resource_types(
    network: &ValueNetwork,
    scope: &Scope,
    processes: &IndexMap<Id, (&Process, Span)>,
) -> Vec<Id> {
    if *scope == Scope::All {
        return network.resource_types.keys().copied().collect();
    }

    let produced: IndexSet<Id> = processes
        .values()
        .flat_map(|(process, _)| process.next.iter().copied())
        .collect();

    network
        .resource_types
        .iter()
        .filter(|(id, resource)| {
            produced.contains(*id) || resource.next.iter().any(|p| processes.contains_key(p))
        })
        .map(|(id, _)| *id)
        .collect()
}

fn add_edge_or_skip(graph: &mut Graph, from: Id, to: Id) {
    if let Err(err) = graph.add_edge(from, to, EdgeStyle::default()) {
        warn!(from:% = from, to:% = to, err:% = err; "Skipping edge outside the assembled graph");
    }
}

fn parse_date(process: Id, field: &'static str, value: &str) -> Result<i64, SourceError> {
    let date =
        NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| SourceError::InvalidDate {
            process,
            field,
            value: value.to_string(),
        })?;
    Ok(date.and_time(NaiveTime::MIN).and_utc().timestamp_millis())
}
