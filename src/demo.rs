//! Example board exercising every kind of board item

use crate::board::{
    Board, DEFAULT_GRAPHIC_LAYER, DEFAULT_GRAPHIC_WIDTH, DEFAULT_TRACK_LAYER, DEFAULT_VIA_LAYERS,
};
use crate::error::Result;
use crate::pad::{PadShape, PadSpec, PadType};
use tracing::info;

/// Build a board with a test module, a track through a via and a board edge
pub fn demo_board() -> Result<Board> {
    let mut pcb = Board::new();

    let m = pcb.create_module("test", (0.0, 0.0))?;
    m.add_arc((0.0, 0.0), 8.0, -90.0, 90.0, DEFAULT_GRAPHIC_LAYER, 0.2)?;
    m.add_line((-8.0, 0.0), (8.0, 0.0), DEFAULT_GRAPHIC_LAYER, 0.2)?;
    m.add_pad(&PadSpec::new((-4.0, -3.0), 2.0).with_drill(1.0))?;
    m.add_pad(
        &PadSpec::new((4.0, -3.0), 2.0)
            .with_drill(1.0)
            .with_layers(["B.Cu", "F.Cu"]),
    )?;
    for (n, x) in [-1.0, -0.5, 0.0, 0.5, 1.0].into_iter().enumerate() {
        m.add_pad(
            &PadSpec::new((x, -4.0), (0.25, 1.2))
                .with_name(n)
                .with_type(PadType::Smd)
                .with_shape(PadShape::Rect),
        )?;
    }
    m.set_position((30.0, 30.0))?;

    let track1 = [(30.0, 26.0), (30.0, 50.0), (60.0, 80.0)];
    let track2 = [(60.0, 80.0), (80.0, 80.0)];
    pcb.add_track(&track1, DEFAULT_TRACK_LAYER, Some(0.25))?;
    pcb.add_track_via(track1[2], DEFAULT_VIA_LAYERS, None, None)?;
    pcb.add_track(&track2, "B.Cu", None)?;

    let ul = (20.0, 20.0);
    let size = (100.0, 80.0);
    let edge = [
        ul,
        (ul.0, ul.1 + size.1),
        (ul.0 + size.0, ul.1 + size.1),
        (ul.0 + size.0, ul.1),
        ul,
    ];
    pcb.add_polyline(&edge, "Edge.Cuts", DEFAULT_GRAPHIC_WIDTH)?;

    info!(
        "Demo board: {} modules, {} tracks, {} vias, {} drawings",
        pcb.modules().count(),
        pcb.tracks().len(),
        pcb.vias().len(),
        pcb.drawings().len()
    );
    Ok(pcb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_board_contents() {
        let pcb = demo_board().unwrap();
        assert_eq!(pcb.modules().count(), 1);
        assert_eq!(pcb.pads().count(), 7);
        assert_eq!(pcb.tracks().len(), 3);
        assert_eq!(pcb.vias().len(), 1);
        assert_eq!(pcb.drawings().len(), 4);

        let names: Vec<&str> = pcb.pads().map(|(_, p)| p.name()).collect();
        assert_eq!(names, vec!["", "", "0", "1", "2", "3", "4"]);
    }
}
