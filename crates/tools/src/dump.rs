use std::fmt;

use dungeon_kernel::World;

/// Text rendering of what a renderer would draw this frame.
///
/// One line per render item, in draw order, with positions relative to the
/// camera's top-left corner.
pub struct DebugTextDump<'a> {
    world: &'a World,
}

impl<'a> DebugTextDump<'a> {
    pub fn new(world: &'a World) -> Self {
        Self { world }
    }

    /// The pathfinding grid as rows of `0`/`1`.
    pub fn path_grid(&self) -> String {
        self.world.path_grid().render_text()
    }
}

impl fmt::Display for DebugTextDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let camera = self.world.camera_rect();
        writeln!(
            f,
            "camera ({:.1}, {:.1}) {}x{}",
            camera.x, camera.y, camera.w, camera.h
        )?;
        for item in self.world.render_list() {
            writeln!(
                f,
                "{:<11} {:>5} ({:>7.1}, {:>7.1}) {}x{}",
                item.kind.to_string(),
                item.id.to_string(),
                item.rect.x - camera.x,
                item.rect.y - camera.y,
                item.rect.w,
                item.rect.h
            )?;
        }
        Ok(())
    }
}
