//! Integration test: coverage guarantees of the planner over a sweep of
//! walls, cell sizes, and obstacle layouts.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashSet;

use wallpath_planner::rasterize::rasterize;
use wallpath_planner::{
    Cell, Obstacle, PlanRequest, PlanResult, PlannerError, SweepDirection, Workspace, plan,
};

/// A deterministic family of obstacle layouts, including overlaps,
/// duplicates, and obstacles hanging off the wall.
fn layouts() -> Vec<Vec<Obstacle>> {
    vec![
        vec![],
        vec![Obstacle::new(0.5, 0.5, 0.25, 0.25)],
        vec![
            Obstacle::new(0.0, 0.0, 0.4, 1.3),
            Obstacle::new(0.3, 1.0, 0.9, 0.2),
            Obstacle::new(0.3, 1.0, 0.9, 0.2),
        ],
        vec![
            Obstacle::new(1.7, 0.2, 2.0, 0.5),
            Obstacle::new(0.95, 0.95, 0.1, 0.1),
        ],
        vec![
            Obstacle::new(0.12, 0.33, 0.07, 0.51),
            Obstacle::new(0.6, 0.1, 0.31, 0.29),
            Obstacle::new(0.65, 0.2, 0.3, 0.3),
        ],
    ]
}

fn walls() -> Vec<(Workspace, f64)> {
    vec![
        (Workspace::new(2.0, 1.5), 0.1),
        (Workspace::new(1.05, 1.95), 0.1),
        (Workspace::new(2.3, 1.1), 0.25),
        (Workspace::new(1.0, 1.0), 0.07),
        (Workspace::new(0.3, 2.0), 0.5),
    ]
}

fn all_cases() -> impl Iterator<Item = (PlanRequest, PlanResult)> {
    walls().into_iter().flat_map(|(ws, cell)| {
        layouts().into_iter().map(move |obstacles| {
            let request = PlanRequest::new(ws, obstacles).with_cell_size(cell);
            let result = plan(&request).expect("valid request should plan");
            (request, result)
        })
    })
}

#[test]
fn every_free_cell_visited_exactly_once() {
    for (request, result) in all_cases() {
        let dims = result.metadata.grid_dimensions;
        let blocked = rasterize(dims, request.cell_size, &request.obstacles).unwrap();

        let mut seen = HashSet::new();
        for &cell in result.path.cells() {
            assert!(dims.contains(cell), "{cell:?} outside grid for {request:?}");
            assert!(!blocked.contains(cell), "{cell:?} is blocked for {request:?}");
            assert!(seen.insert(cell), "{cell:?} visited twice for {request:?}");
        }

        let free: usize = (0..dims.rows)
            .flat_map(|r| (0..dims.cols).map(move |c| Cell::new(r, c)))
            .filter(|&c| !blocked.contains(c))
            .count();
        assert_eq!(seen.len(), free, "missed free cells for {request:?}");
    }
}

#[test]
fn cell_count_identity() {
    for (_, result) in all_cases() {
        let m = result.metadata;
        assert_eq!(m.obstacle_cells + m.free_cells, m.total_cells);
        assert_eq!(m.path_points, m.free_cells);
        assert_eq!(m.path_points, result.path.len());
        assert_eq!(
            m.total_cells,
            m.grid_dimensions.rows * m.grid_dimensions.cols
        );
    }
}

#[test]
fn duplicated_obstacle_list_is_idempotent() {
    for (request, result) in all_cases() {
        let mut doubled = request.clone();
        doubled.obstacles.extend(request.obstacles.iter().copied());
        let doubled_result = plan(&doubled).unwrap();
        assert_eq!(result, doubled_result, "L ++ L differs for {request:?}");
    }
}

#[test]
fn obstacle_order_does_not_matter() {
    for (request, result) in all_cases() {
        let mut reversed = request.clone();
        reversed.obstacles.reverse();
        assert_eq!(plan(&reversed).unwrap(), result);
    }
}

#[test]
fn row_runs_are_monotonic() {
    for (_, result) in all_cases() {
        for pair in result.path.cells().windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if a.row == b.row {
                match SweepDirection::for_row(a.row) {
                    SweepDirection::LeftToRight => assert!(b.col > a.col),
                    SweepDirection::RightToLeft => assert!(b.col < a.col),
                }
            } else {
                assert!(b.row > a.row);
            }
        }
    }
}

#[test]
fn grid_aligned_obstacle_has_nine_cell_footprint() {
    let request = PlanRequest::new(
        Workspace::new(5.0, 5.0),
        vec![Obstacle::new(1.0, 1.0, 0.25, 0.25)],
    );
    let result = plan(&request).unwrap();
    assert_eq!(result.metadata.obstacle_cells, 9);
    let path: HashSet<Cell> = result.path.cells().iter().copied().collect();
    for row in 10..13 {
        for col in 10..13 {
            assert!(!path.contains(&Cell::new(row, col)));
        }
    }
    assert!(path.contains(&Cell::new(13, 10)));
    assert!(path.contains(&Cell::new(10, 13)));
    assert!(path.contains(&Cell::new(9, 9)));
}

#[test]
fn reference_scenario() {
    let request: PlanRequest = serde_json::from_str(
        r#"{
            "wall_width": 5.0,
            "wall_height": 5.0,
            "obstacles": [
                {"x": 1.0, "y": 1.0, "width": 0.25, "height": 0.25},
                {"x": 3.0, "y": 2.0, "width": 0.25, "height": 0.25},
                {"x": 2.0, "y": 3.5, "width": 0.25, "height": 0.25}
            ]
        }"#,
    )
    .unwrap();
    let m = plan(&request).unwrap().metadata;
    assert_eq!((m.grid_dimensions.rows, m.grid_dimensions.cols), (50, 50));
    assert_eq!(m.total_cells, 2500);
    assert_eq!(m.obstacle_cells, 27);
    assert_eq!(m.free_cells, 2473);
    assert_eq!(m.path_points, 2473);
    assert!((m.coverage_percentage - 100.0).abs() < f64::EPSILON);
}

#[test]
fn open_wall_without_obstacles() {
    let request = PlanRequest::new(Workspace::new(2.0, 2.0), vec![]);
    let result = plan(&request).unwrap();
    assert_eq!(result.path.len(), 400);
    assert_eq!(result.metadata.obstacle_cells, 0);
}

#[test]
fn fully_covered_wall_is_degenerate_but_valid() {
    let request = PlanRequest::new(
        Workspace::new(1.0, 1.0),
        vec![Obstacle::new(0.0, 0.0, 1.0, 1.0)],
    );
    let result = plan(&request).unwrap();
    assert!(result.path.is_empty());
    assert_eq!(result.metadata.free_cells, 0);
    assert_eq!(result.metadata.path_points, 0);
    assert!(result.metadata.coverage_percentage.abs() < f64::EPSILON);
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["path"], serde_json::json!([]));
}

#[test]
fn oversized_obstacle_covers_whole_wall() {
    let request = PlanRequest::new(
        Workspace::new(1.0, 1.0),
        vec![Obstacle::new(0.0, 0.0, 10.0, 10.0)],
    );
    let result = plan(&request).unwrap();
    assert_eq!(result.metadata.free_cells, 0);
    assert!(result.path.is_empty());
}

#[test]
fn invalid_inputs_are_rejected() {
    let zero_width = PlanRequest::new(Workspace::new(0.0, 5.0), vec![]);
    assert!(matches!(
        plan(&zero_width),
        Err(PlannerError::InvalidDimension { .. })
    ));

    let bad_obstacle = PlanRequest::new(
        Workspace::new(5.0, 5.0),
        vec![Obstacle::new(1.0, 1.0, -1.0, 1.0)],
    );
    assert!(matches!(
        plan(&bad_obstacle),
        Err(PlannerError::InvalidObstacle { .. })
    ));

    let bad_cell = PlanRequest::new(Workspace::new(5.0, 5.0), vec![]).with_cell_size(f64::NAN);
    assert!(matches!(
        plan(&bad_cell),
        Err(PlannerError::InvalidDimension {
            name: "cell_size",
            ..
        })
    ));
}

#[test]
fn planner_is_callable_from_many_threads() {
    let request = PlanRequest::new(
        Workspace::new(3.0, 3.0),
        vec![Obstacle::new(1.0, 1.0, 1.0, 1.0)],
    );
    let expected = plan(&request).unwrap();
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4).map(|_| s.spawn(|| plan(&request).unwrap())).collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    });
}
