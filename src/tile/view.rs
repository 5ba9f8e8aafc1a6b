use super::{
    Tile,
    map_area::MapArea,
    preview::{self, PreviewOverlay, TileSource, ToolState},
    rendering::{TileMapRenderFlags, TileMapRenderStats, TileMapRenderer},
};
use crate::{
    log,
    app::input::{InputAction, InputEvent, MouseButton, UiInputEvent},
    config::TileMapViewConfigs,
    render::{PictureCache, PictureHandle, RenderSystem},
    sim::{CityModel, Construction, InfoBoxHost},
    utils::{
        Size,
        coords::{self, Cell, MapOrigin, ScreenPoint},
    },
};

// ----------------------------------------------
// TileMapView
// ----------------------------------------------

// Draws the city map and routes pointer input into tool previews and
// commits. Holds no world state; the city and the map area are borrowed
// per call.
pub struct TileMapView {
    preview: PreviewOverlay,
    renderer: TileMapRenderer,

    // Cached from the last drawn frame. Hit-testing uses the same origin the
    // player is looking at. Zero until the first frame.
    origin: MapOrigin,
    viewport_size: Size,

    preview_enabled: bool,
    render_flags: TileMapRenderFlags,
    info_box_top_margin: i32,
}

impl TileMapView {
    pub fn new(configs: &TileMapViewConfigs, picture_cache: &dyn PictureCache) -> Self {
        let cleared_land = &configs.cleared_land_picture;
        let cleared_land_picture = picture_cache.find_picture(&cleared_land.group, cleared_land.index);

        if !cleared_land_picture.is_valid() {
            log::warn!(log::channel!("tilemap"), "Cleared land picture {cleared_land} not found. Using placeholder.");
        }

        Self::with_cleared_land_picture(configs, cleared_land_picture)
    }

    pub fn with_cleared_land_picture(configs: &TileMapViewConfigs, cleared_land_picture: PictureHandle) -> Self {
        Self {
            preview: PreviewOverlay::new(cleared_land_picture),
            renderer: TileMapRenderer::new(),
            origin: MapOrigin::default(),
            viewport_size: Size::zero(),
            preview_enabled: configs.preview_enabled,
            render_flags: configs.render_flags,
            info_box_top_margin: configs.info_box_top_margin,
        }
    }

    // ----------------------
    // Tools:
    // ----------------------

    pub fn set_build_instance(&mut self, construction: Box<dyn Construction>) {
        log::verbose!(log::channel!("tilemap"), "Build tool armed, footprint size {}.", construction.size());
        self.preview.set_build_instance(construction);
    }

    pub fn set_remove_tool(&mut self) {
        log::verbose!(log::channel!("tilemap"), "Remove tool armed.");
        self.preview.set_remove_tool();
    }

    pub fn clear_tool(&mut self) {
        let previous = self.preview.clear_tool();
        if !matches!(previous, ToolState::None) {
            log::verbose!(log::channel!("tilemap"), "{previous} tool disarmed.");
        }
    }

    #[inline]
    pub fn tool(&self) -> &ToolState {
        self.preview.tool()
    }

    #[inline]
    pub fn preview(&self) -> &PreviewOverlay {
        &self.preview
    }

    // ----------------------
    // Settings:
    // ----------------------

    #[inline]
    pub fn set_preview(&mut self, enabled: bool) {
        self.preview_enabled = enabled;
    }

    #[inline]
    pub fn is_preview_enabled(&self) -> bool {
        self.preview_enabled
    }

    #[inline]
    pub fn set_render_flags(&mut self, flags: TileMapRenderFlags) {
        self.render_flags = flags;
    }

    #[inline]
    pub fn render_flags(&self) -> TileMapRenderFlags {
        self.render_flags
    }

    #[inline]
    pub fn origin(&self) -> MapOrigin {
        self.origin
    }

    #[inline]
    pub fn stats(&self) -> TileMapRenderStats {
        self.renderer.stats()
    }

    // ----------------------
    // Queries:
    // ----------------------

    #[inline]
    pub fn tile_source<'a>(&'a self, city: &'a dyn CityModel) -> TileSource<'a> {
        TileSource::new(city, &self.preview, self.preview_enabled)
    }

    #[inline]
    pub fn cell_at_screen(&self, point: ScreenPoint, map_size: i32) -> Option<Cell> {
        coords::screen_to_cell(point, self.origin, map_size)
    }

    // Tile under the screen point as currently displayed, preview included.
    pub fn tile_at_screen<'a>(&'a self, point: ScreenPoint, city: &'a dyn CityModel) -> Option<&'a Tile> {
        let cell = self.cell_at_screen(point, city.tilemap().size())?;
        self.tile_source(city).try_resolve(cell)
    }

    // ----------------------
    // Drawing:
    // ----------------------

    pub fn draw_tilemap(&mut self,
                        render_sys: &mut impl RenderSystem,
                        city: &dyn CityModel,
                        map_area: &dyn MapArea)
                        -> TileMapRenderStats {
        let viewport_size = render_sys.viewport_size();

        self.viewport_size = viewport_size;
        self.origin = MapOrigin::centered(viewport_size,
                                          map_area.center_x(),
                                          map_area.center_z(),
                                          city.tilemap().size());

        let tiles = TileSource::new(city, &self.preview, self.preview_enabled);

        self.renderer.draw_map(render_sys,
                               city,
                               &tiles,
                               map_area.tiles(),
                               self.origin,
                               self.render_flags)
    }

    // ----------------------
    // Input:
    // ----------------------

    pub fn handle_event(&mut self,
                        event: &InputEvent,
                        city: &mut dyn CityModel,
                        map_area: &mut dyn MapArea,
                        info_box_host: &mut dyn InfoBoxHost)
                        -> UiInputEvent {
        match *event {
            InputEvent::CursorMoved(position) => {
                self.on_cursor_moved(position, city)
            }
            InputEvent::MouseButton(button, InputAction::Press, position) => {
                self.on_mouse_press(button, position, city, map_area, info_box_host)
            }
            InputEvent::MouseButton(_, InputAction::Release, _) => {
                UiInputEvent::NotHandled
            }
        }
    }

    fn on_cursor_moved(&mut self, position: ScreenPoint, city: &dyn CityModel) -> UiInputEvent {
        match self.cell_at_screen(position, city.tilemap().size()) {
            Some(cell) => {
                self.preview.update(city, cell);
                UiInputEvent::Handled
            }
            None => {
                // Off the map: nothing to preview.
                self.preview.discard();
                UiInputEvent::NotHandled
            }
        }
    }

    fn on_mouse_press(&mut self,
                      button: MouseButton,
                      position: ScreenPoint,
                      city: &mut dyn CityModel,
                      map_area: &mut dyn MapArea,
                      info_box_host: &mut dyn InfoBoxHost)
                      -> UiInputEvent {
        let Some(cell) = self.cell_at_screen(position, city.tilemap().size()) else {
            return UiInputEvent::NotHandled;
        };

        match button {
            MouseButton::Left => self.on_left_click(cell, city, map_area),
            MouseButton::Right => self.on_right_click(cell, city, info_box_host),
            MouseButton::Middle => {}
        }

        UiInputEvent::Handled
    }

    fn on_left_click(&mut self, cell: Cell, city: &mut dyn CityModel, map_area: &mut dyn MapArea) {
        let mut committed = false;

        if self.preview.is_remove_armed() {
            log::info!(log::channel!("tilemap"), "Clearing land at {cell}.");
            city.clear_land(cell);
            committed = true;
        } else if let Some(construction) = self.preview.build_instance() {
            if preview::is_buildable(construction, city.tilemap(), cell) {
                log::info!(log::channel!("tilemap"), "Building at {cell}, footprint size {}.", construction.size());
                city.build(construction, cell);
                committed = true;
            } else {
                log::verbose!(log::channel!("tilemap"), "Cannot build at {cell}.");
            }
        } else {
            map_area.set_center_ij(cell);
        }

        // The map changed under the cursor, so the old preview is stale.
        if committed {
            self.preview.update(city, cell);
        }
    }

    fn on_right_click(&mut self, cell: Cell, city: &dyn CityModel, info_box_host: &mut dyn InfoBoxHost) {
        self.clear_tool();

        // Re-resolved after the discard, so this is always the authoritative tile.
        let tiles = self.tile_source(city);
        let Some(overlay) = tiles.try_resolve(cell).and_then(|tile| tiles.tile_overlay(tile)) else {
            return;
        };

        if let Some(mut info_box) = overlay.make_info_box() {
            let x = (self.viewport_size.width - info_box.width()) / 2;
            info_box.set_position(ScreenPoint::new(x, self.info_box_top_margin));
            info_box_host.set_info_box(info_box);
        }
    }
}
