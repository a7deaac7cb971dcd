//! Example: Building a scene in code
//!
//! This example builds a small load-balanced web stack with the scene API,
//! without a document, and writes it to SVG.

use infragram::{
    DiagramBuilder,
    color::Color,
    geometry::{Point, Size},
    scene::{
        AnchorPoint, AnchorSpec, Canvas, Connector, ConnectorStyle, Legend, LegendItem, Node,
        Scene, Zone,
    },
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Building scene...\n");

    let web_color = Color::new("lightblue")?;
    let db_color = Color::new("lightyellow")?;

    let mut scene = Scene::new(Canvas::new(720.0, 400.0)?);
    scene.set_title("Load Balanced Web Stack");

    scene.add_zone(
        Zone::new(Point::new(240.0, 60.0), Size::new(440.0, 300.0))
            .with_id("private")
            .with_fill(Color::new("whitesmoke")?)
            .with_label("Private network"),
    )?;

    scene.add_node(Node::circle("user", Point::new(80.0, 200.0), 35.0).with_label("User"))?;
    scene.add_node(
        Node::rectangle("lb", Point::new(270.0, 175.0), Size::new(110.0, 50.0))
            .with_fill(Color::new("orange")?)
            .with_label("Load\nBalancer"),
    )?;

    // Two web servers stacked on the right of the balancer
    for (index, y) in [(1, 100.0), (2, 250.0)] {
        let id = format!("web{index}");
        scene.add_node(
            Node::rectangle(&id, Point::new(440.0, y), Size::new(100.0, 50.0))
                .with_fill(web_color)
                .with_label(&format!("Web {index}")),
        )?;
        scene.add_connector(Connector::new(
            AnchorSpec::node("lb", AnchorPoint::Right),
            AnchorSpec::node(&id, AnchorPoint::Left),
            ConnectorStyle::Directed,
        ))?;
        scene.add_connector(Connector::new(
            AnchorSpec::node(&id, AnchorPoint::Right),
            AnchorSpec::node("db", AnchorPoint::Auto),
            ConnectorStyle::Dashed,
        ))?;
    }

    scene.add_node(
        Node::circle("db", Point::new(620.0, 200.0), 35.0)
            .with_fill(db_color)
            .with_label("DB"),
    )?;
    scene.add_connector(
        Connector::new(
            AnchorSpec::node("user", AnchorPoint::Auto),
            AnchorSpec::node("lb", AnchorPoint::Left),
            ConnectorStyle::Directed,
        )
        .with_label("HTTPS"),
    )?;

    scene.add_legend(
        Legend::new(Point::new(20.0, 300.0))
            .with_title("Tiers")
            .with_item(LegendItem::new(web_color, "web"))
            .with_item(LegendItem::new(db_color, "storage")),
    )?;

    println!("Created scene:");
    println!("  Nodes: {}", scene.nodes().len());
    println!("  Connectors: {}", scene.connectors().len());
    println!();

    let builder = DiagramBuilder::default();
    for diagnostic in builder.check(&scene) {
        println!("  {diagnostic}");
    }

    println!("Rendering to SVG...");
    let output_path = "build_scene_output.svg";
    builder.render_to_file(&scene, output_path, None)?;
    println!("SVG written to: {output_path}");

    Ok(())
}
