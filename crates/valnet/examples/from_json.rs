//! Example: Laying out a value network and driving the canvas
//!
//! Loads a small export, runs the layout, replays a few pointer events
//! through the canvas and writes the final scene to `from_json.svg`.

use std::{path::Path, time::Instant};

use valnet::{
    GraphBuilder,
    canvas::Canvas,
    export::SvgBuilder,
    geometry::Point,
    identifier::Id,
    interaction::{InputEvent, PointerButton},
    shell::{Renderer, Scene},
    source::Scope,
};

const EXPORT: &str = r#"{
    "processes": {
        "Process-1": { "name": "Harvest", "start": "2014-03-01", "end": "2014-03-03",
                       "url": "/accounting/process/1/", "next": ["ResourceType-1"] },
        "Process-2": { "name": "Dry", "start": "2014-03-04", "end": "2014-03-10",
                       "next": ["ResourceType-2"] }
    },
    "resource_types": {
        "ResourceType-1": { "name": "Fresh herbs", "next": ["Process-2"] },
        "ResourceType-2": { "name": "Dried herbs", "next": [] }
    }
}"#;

/// Counts frames instead of drawing them.
struct FrameCounter(usize);

impl Renderer for FrameCounter {
    fn render(&mut self, scene: &Scene<'_>) {
        self.0 += 1;
        println!(
            "  frame {}: {} nodes, transform {}",
            self.0,
            scene.graph.nodes_count(),
            scene.viewport.svg_transform()
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading value network...\n");

    let builder = GraphBuilder::default();
    let network = builder.load(EXPORT)?;
    let graph = builder.assemble(&network, &Scope::All)?;

    let mut canvas = Canvas::from_config(graph, Box::new(FrameCounter(0)), builder.config())?;
    let start = Instant::now();
    canvas.run_layout(start)?;

    // Drag the first resource type 40 units to the right.
    let herbs = Id::new("ResourceType-1");
    let grab = canvas.graph().node(herbs).map(|node| node.position());
    let events = [
        InputEvent::PointerDown {
            position: Point::new(0.0, 0.0),
            button: PointerButton::Primary,
            node: Some(herbs),
        },
        InputEvent::PointerMove {
            position: Point::new(40.0, 0.0),
            primary_held: true,
        },
        InputEvent::PointerUp,
        InputEvent::Wheel { delta_y: -1.0 },
    ];
    for event in events {
        if let Some(effect) = canvas.handle_input(event, Instant::now())? {
            println!("effect: {effect:?}");
        }
    }
    canvas.flush();

    println!(
        "\n{herbs} moved from {:?} to {:?}",
        grab,
        canvas.graph().node(herbs).map(|node| node.position())
    );

    let renderer = SvgBuilder::new()
        .with_style(builder.config().style())
        .build()?;
    renderer.write_to(
        &Scene {
            graph: canvas.graph(),
            viewport: canvas.viewport(),
        },
        Path::new("from_json.svg"),
    )?;
    println!("Wrote from_json.svg");

    Ok(())
}
