//! Integration tests for void_scene
//!
//! Diffs whole snapshots the way a presenter walks them

use void_scene::*;

#[derive(Debug, Clone, PartialEq)]
struct Facet(&'static str, i32);

impl HasKind for Facet {
    fn kind(&self) -> ComponentKind {
        ComponentKind::new(self.0)
    }
}

type Node = SceneNode<Facet>;

/// Flatten a two-snapshot diff into readable operations
fn diff(prev: &Node, next: &Node, path: &str, out: &mut Vec<String>) {
    let ops = merge(
        prev.components(),
        next.components(),
        Vec::new(),
        |kind, _, mut ops| {
            ops.push(format!("{}: -{}", path, kind));
            ops
        },
        |kind, p, n, mut ops| {
            if p != n {
                ops.push(format!("{}: ~{}", path, kind));
            }
            ops
        },
        |kind, _, mut ops| {
            ops.push(format!("{}: +{}", path, kind));
            ops
        },
    );
    out.extend(ops);

    for name in prev.children().keys() {
        if next.child(name).is_none() {
            out.push(format!("{}: destroy {}", path, name));
        }
    }
    for (name, child) in next.children() {
        let child_path = format!("{}/{}", path, name);
        match prev.child(name) {
            Some(before) => diff(before, child, &child_path, out),
            None => {
                out.push(format!("{}: create {}", path, name));
                diff(&Node::new(name.as_str()), child, &child_path, out);
            }
        }
    }
}

fn scene(speed: i32, with_enemy: bool) -> Node {
    let mut root = Node::new("root").with_child(
        Node::new("player")
            .with_component(Facet("transform", 0))
            .with_component(Facet("motion", speed)),
    );
    if with_enemy {
        root = root.with_child(Node::new("enemy").with_component(Facet("transform", 5)));
    }
    root
}

#[test]
fn test_equal_snapshots_have_empty_diff() {
    let mut ops = Vec::new();
    diff(&scene(1, true), &scene(1, true), "root", &mut ops);
    assert!(ops.is_empty());
}

#[test]
fn test_diff_reports_changes_in_order() {
    let mut ops = Vec::new();
    diff(&scene(1, false), &scene(2, true), "root", &mut ops);
    assert_eq!(
        ops,
        vec![
            "root: create enemy",
            "root/enemy: +transform",
            "root/player: ~motion",
        ]
    );

    let mut ops = Vec::new();
    diff(&scene(2, true), &scene(2, false), "root", &mut ops);
    assert_eq!(ops, vec!["root: destroy enemy"]);
}

#[test]
fn test_snapshot_clone_is_independent() {
    let original = scene(1, true);
    let retained = original.clone();
    let edited = original.with_child(Node::new("extra"));

    assert_ne!(retained, edited);
    assert_eq!(retained, scene(1, true));
}

#[test]
fn test_identity_key_serialization() {
    let keys = vec![
        IdentityKey::from(3),
        IdentityKey::from("menu.play"),
        IdentityKey::from(vec![1u8, 2]),
    ];
    let json = serde_json::to_string(&keys).unwrap();
    let back: Vec<IdentityKey> = serde_json::from_str(&json).unwrap();
    assert_eq!(back[1], IdentityKey::Str("menu.play".into()));
}
