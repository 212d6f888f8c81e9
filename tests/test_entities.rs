use tilt_shooter::entities::*;

#[test]
fn rect_overlap_is_symmetric() {
    let a = Rect::new(20.0, 100.0, 10.0, 20.0);
    let b = Rect::new(15.0, 95.0, 40.0, 40.0);
    assert!(a.overlaps(&b));
    assert!(b.overlaps(&a));
}

#[test]
fn rect_shared_edge_is_not_overlap() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let right = Rect::new(10.0, 0.0, 10.0, 10.0);
    let above = Rect::new(0.0, 10.0, 10.0, 10.0);
    assert!(!a.overlaps(&right));
    assert!(!a.overlaps(&above));
}

#[test]
fn rect_containment_overlaps() {
    let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
    let inner = Rect::new(40.0, 40.0, 5.0, 5.0);
    assert!(outer.overlaps(&inner));
    assert!(inner.overlaps(&outer));
}

#[test]
fn game_state_clone_is_independent() {
    let original = GameState {
        player: Player { x: 155.0, y: 20.0, width: 50.0, height: 50.0 },
        projectiles: Vec::new(),
        obstacles: Vec::new(),
        status: SessionState::Running,
        next_id: 1,
        width: 360.0,
        height: 640.0,
    };
    let mut cloned = original.clone();

    // Mutating the clone must not affect the original
    cloned.player.x = 0.0;
    cloned.status = SessionState::GameOver;
    cloned.obstacles.push(Obstacle { id: 1, x: 5.0, y: 5.0 });

    assert_eq!(original.player.x, 155.0);
    assert!(!original.is_over());
    assert!(original.obstacles.is_empty());
    assert!(cloned.is_over());
}
