use anya_pathfinding::{
    anya::{SearchStatus, Snapshot, SnapshotItem},
    Anya, Fraction, GridGraph, Path,
};
use glam::IVec2;
use macroquad::{
    color::hsl_to_rgb,
    prelude::{
        clear_background, draw_circle, draw_line, draw_rectangle, draw_text, get_char_pressed,
        is_mouse_button_down, mouse_position, next_frame, Color, Conf, MouseButton, Vec2, BLACK,
        BLUE, DARKGRAY, DARKGREEN, GRAY, LIGHTGRAY, RED, WHITE,
    },
};
use rand::{rngs::StdRng, SeedableRng};

const WIDTH: i32 = 800;
const HEIGHT: i32 = 600;

const TILES_X: i32 = 40;
const TILES_Y: i32 = 30;
const CELL: f32 = 20.0;
const BLOCKED_RATIO: f64 = 0.25;

struct Colorscheme {
    background: Color,
    tile: Color,
    text: Color,
    start: Color,
    path: Color,
    end: Color,
    next: Color,
    interval: fn(usize) -> Color,
}

#[allow(dead_code)]
const DARK_COLORSCHEME: Colorscheme = Colorscheme {
    background: BLACK,
    tile: DARKGRAY,
    text: WHITE,
    start: DARKGREEN,
    end: RED,
    path: BLUE,
    next: WHITE,
    interval: |i| hsl_to_rgb((i % 32) as f32 / 32.0, 1.0, 0.5),
};

#[allow(dead_code)]
const LIGHT_COLORSCHEME: Colorscheme = Colorscheme {
    background: WHITE,
    tile: DARKGRAY,
    text: BLACK,
    start: DARKGREEN,
    end: RED,
    path: BLUE,
    next: BLACK,
    interval: |i| hsl_to_rgb((i % 32) as f32 / 32.0, 1.0, 0.5),
};

#[allow(dead_code)]
const GRAYSCALE: Colorscheme = Colorscheme {
    background: WHITE,
    tile: GRAY,
    text: BLACK,
    end: GRAY,
    path: BLACK,
    next: BLACK,
    interval: |i| hsl_to_rgb(1.0, 0.0, ((i % 8) as f32 / 8.0).min(0.9)),
    start: BLACK,
};

const COLORSCHEME: Colorscheme = LIGHT_COLORSCHEME;

/// Draws a dotted line, performance isn't great due to many draw calls. This is
/// acceptable as it is only for visualization.
fn draw_line_dotted(p: Vec2, q: Vec2, thickness: f32, color: Color) {
    let step = thickness * 2.0;
    let radius = thickness / 2.0;

    let steps = (p.distance(q) / step).floor() as usize;
    if steps == 0 {
        return;
    }

    let dir = (q - p).normalize();

    (0..=steps).for_each(|val| {
        let t = p + dir * val as f32 * step;

        draw_circle(t.x, t.y, radius, color);
    })
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Any-angle path finding with interval search".to_owned(),
        fullscreen: false,
        window_width: WIDTH,
        window_height: HEIGHT,
        ..Default::default()
    }
}

/// Screen position of a point on the vertex lattice. Rows grow upwards.
fn to_screen(x: f32, y: f32) -> Vec2 {
    Vec2::new(x * CELL, (TILES_Y as f32 - y) * CELL)
}

fn vertex_to_screen(vertex: IVec2) -> Vec2 {
    to_screen(vertex.x as f32, vertex.y as f32)
}

/// Closest vertex to a screen position
fn to_vertex(pos: Vec2) -> IVec2 {
    let x = (pos.x / CELL).round() as i32;
    let y = TILES_Y - (pos.y / CELL).round() as i32;
    IVec2::new(x.clamp(0, TILES_X), y.clamp(0, TILES_Y))
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    let mut anya = Anya::default();
    let mut seed = 0;
    let mut grid = None;

    let mut start = IVec2::new(0, 0);
    let mut goal = IVec2::new(TILES_X, TILES_Y);

    // Expansions to show, zero runs every search to completion
    let mut steps = 0;

    loop {
        clear_background(COLORSCHEME.background);

        if is_mouse_button_down(MouseButton::Left) {
            let vertex = to_vertex(mouse_position().into());

            if vertex.as_vec2().distance(goal.as_vec2()) < vertex.as_vec2().distance(start.as_vec2())
            {
                goal = vertex
            } else {
                start = vertex;
            }
        }

        if let Some(c) = get_char_pressed() {
            match c {
                'r' => {
                    grid = None;
                    seed += 1
                }
                'R' if seed > 0 => {
                    grid = None;
                    seed -= 1
                }
                'l' => {
                    steps += 1;
                }
                'L' => {
                    steps += 10;
                }
                'h' if steps > 0 => {
                    steps -= 1;
                }
                'c' => {
                    steps = 0;
                }
                _ => {}
            }
        }

        let grid: &GridGraph = grid.get_or_insert_with(|| {
            GridGraph::random(
                TILES_X,
                TILES_Y,
                BLOCKED_RATIO,
                &mut StdRng::seed_from_u64(seed),
            )
        });

        grid.draw();

        match anya.search(grid, start, goal) {
            Ok(mut search) => {
                let path = if steps == 0 {
                    search.run()
                } else {
                    for _ in 0..steps {
                        if search.step() != SearchStatus::Searching {
                            break;
                        }
                    }
                    search.path()
                };

                search.snapshot().draw();
                path.draw();

                let status = format!(
                    "expanded {}, generated {}, length {:.3}",
                    search.expanded(),
                    search.generated(),
                    path.length()
                );
                draw_text(&status, 10.0, 20.0, 24.0, COLORSCHEME.text);
            }
            Err(e) => {
                draw_text(&e.to_string(), 10.0, 20.0, 24.0, COLORSCHEME.text);
            }
        }

        let (p, q) = (vertex_to_screen(start), vertex_to_screen(goal));
        draw_circle(p.x, p.y, POINT_RADIUS, COLORSCHEME.start);
        draw_circle(q.x, q.y, POINT_RADIUS, COLORSCHEME.end);

        next_frame().await
    }
}

const POINT_RADIUS: f32 = 8.0;
const VERTEX_RADIUS: f32 = 5.0;
const INTERVAL_THICKNESS: f32 = 3.0;
const RAY_RADIUS: f32 = 1.5;
const PATH_THICKNESS: f32 = 4.0;
const GRID_THICKNESS: f32 = 1.0;

trait Draw {
    fn draw(&self);
}

impl Draw for GridGraph {
    fn draw(&self) {
        for x in 0..=TILES_X {
            let (a, b) = (to_screen(x as f32, 0.0), to_screen(x as f32, TILES_Y as f32));
            draw_line(a.x, a.y, b.x, b.y, GRID_THICKNESS, LIGHTGRAY);
        }

        for y in 0..=TILES_Y {
            let (a, b) = (to_screen(0.0, y as f32), to_screen(TILES_X as f32, y as f32));
            draw_line(a.x, a.y, b.x, b.y, GRID_THICKNESS, LIGHTGRAY);
        }

        for tile in self.blocked_tiles() {
            // Top left corner of the tile on screen
            let corner = vertex_to_screen(tile + IVec2::Y);
            draw_rectangle(corner.x, corner.y, CELL, CELL, COLORSCHEME.tile);
        }
    }
}

fn fraction_to_screen(x: Fraction, row: i32) -> Vec2 {
    to_screen(x.to_f32(), row as f32)
}

fn draw_interval(item: &SnapshotItem, thickness: f32, color: Color) {
    let a = fraction_to_screen(item.x_l, item.row);
    let b = fraction_to_screen(item.x_r, item.row);
    let base = vertex_to_screen(item.base);

    draw_line_dotted(base, a, RAY_RADIUS, color);
    draw_line_dotted(base, b, RAY_RADIUS, color);
    draw_line(a.x, a.y, b.x, b.y, thickness, color);
}

impl Draw for Snapshot {
    fn draw(&self) {
        for (i, item) in self.intervals.iter().enumerate() {
            draw_interval(item, INTERVAL_THICKNESS, (COLORSCHEME.interval)(i));
        }

        if let Some(next) = &self.next {
            draw_interval(next, INTERVAL_THICKNESS * 2.0, COLORSCHEME.next);
        }
    }
}

impl Draw for Path {
    fn draw(&self) {
        self.windows(2).for_each(|val| {
            let a = vertex_to_screen(val[0]);
            let b = vertex_to_screen(val[1]);

            draw_circle(a.x, a.y, VERTEX_RADIUS, COLORSCHEME.path);
            draw_circle(b.x, b.y, VERTEX_RADIUS, COLORSCHEME.path);
            draw_line(a.x, a.y, b.x, b.y, PATH_THICKNESS, COLORSCHEME.path);
        })
    }
}
