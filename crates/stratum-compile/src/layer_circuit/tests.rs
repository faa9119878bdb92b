use super::*;
use crate::rotation::Rotation;
use stratum_stim::{emit, parse};

fn layered(source: &str) -> LayerCircuit {
    LayerCircuit::from_circuit(&parse(source).unwrap()).unwrap()
}

fn text(circuit: &LayerCircuit) -> String {
    emit(&circuit.to_circuit().unwrap())
}

fn rot(entries: &[(u32, Rotation)]) -> Layer {
    Layer::Rotation(entries.iter().map(|&(q, r)| (QubitId(q), r)).collect())
}

#[test]
fn test_layered_round_trip() {
    for source in [
        "H 0\nTICK\nCZ 0 1\nTICK\nM 0 1\n",
        "M 0\nDETECTOR rec[-1]\nTICK\nH 0\n",
        "R 0\nTICK\nREPEAT 2 {\n    H 0\n    TICK\n    M 0\n    TICK\n}\nM 0\n",
        "CX rec[-1] 0\nTICK\nMPP X0*Z1\n",
    ] {
        assert_eq!(text(&layered(source)), source);
    }
}

#[test]
fn test_loop_body_without_ticks_gets_one() {
    let circuit = layered("REPEAT 3 {\n    DETECTOR rec[-1]\n}\n");
    assert_eq!(text(&circuit), "REPEAT 3 {\n    DETECTOR rec[-1]\n}\n");

    let circuit = layered("REPEAT 3 {\n    CZ 0 1\n}\n");
    assert_eq!(text(&circuit), "REPEAT 3 {\n    CZ 0 1\n    TICK\n}\n");
}

#[test]
fn test_nested_loop_closes_outer_body_once() {
    let source = "REPEAT 2 {\n    M 0\n    TICK\n    REPEAT 3 {\n        M 1\n        TICK\n    }\n}\n";
    let circuit = layered(source);
    assert!(!circuit.layers.iter().any(|l| match l {
        Layer::Loop(lp) => lp.body.ends_with_pending_tick(),
        _ => false,
    }));
    assert_eq!(text(&circuit), source);
}

#[test]
fn test_local_optimization_cancels_rotations() {
    let circuit = layered("H 0\nTICK\nH 0\nTICK\nM 0\n").with_locally_optimized_layers();
    assert_eq!(text(&circuit), "M 0\n");
}

#[test]
fn test_local_optimization_drops_empty_ticks() {
    let circuit = layered("H 0\nTICK\nTICK\nTICK\nM 0\n").with_locally_optimized_layers();
    assert_eq!(text(&circuit), "H 0\nTICK\nM 0\n");
}

#[test]
fn test_local_optimization_recurses_into_loops() {
    let circuit =
        layered("REPEAT 4 {\n    H 0\n    TICK\n    H 0\n    TICK\n    M 0\n    TICK\n}\n")
            .with_locally_optimized_layers();
    assert_eq!(text(&circuit), "REPEAT 4 {\n    M 0\n    TICK\n}\n");
}

#[test]
fn test_z_basis_conversion() {
    let circuit = layered("MX 0\n").to_z_basis();
    assert_eq!(circuit.layers.len(), 3);
    assert_eq!(text(&circuit), "H 0\nTICK\nM 0\nTICK\nH 0\n");
}

#[test]
fn test_loop_rotation_rolling() {
    let circuit = layered("REPEAT 5 {\n    M 0\n    TICK\n    H 0\n    TICK\n}\n")
        .with_rolled_loop_rotations();
    assert_eq!(
        text(&circuit),
        "H 0\nTICK\nREPEAT 5 {\n    H 0\n    TICK\n    M 0\n    TICK\n}\nH 0\n"
    );
}

#[test]
fn test_loop_rotation_rolling_skips_trailing_annotations() {
    let circuit =
        layered("REPEAT 2 {\n    M 0\n    TICK\n    H_YZ 0\n    DETECTOR rec[-1]\n    TICK\n}\n")
            .with_rolled_loop_rotations();
    let Layer::Loop(lp) = &circuit.layers[1] else {
        panic!("expected loop, got {:?}", circuit.layers[1]);
    };
    assert_eq!(lp.body.layers[0], rot(&[(0, Rotation::H_YZ)]));
    assert_eq!(circuit.layers[0], rot(&[(0, Rotation::H_YZ)]));
}

#[test]
fn test_loop_rotation_rolling_moves_whole_rotation_run() {
    let circuit = layered("REPEAT 2 {\n    CX 0 1\n    H 0\n}\n")
        .to_z_basis()
        .with_rolled_loop_rotations();
    assert_eq!(
        text(&circuit),
        "H 0 1\nTICK\nREPEAT 2 {\n    H 0\n    TICK\n    CZ 0 1\n    TICK\n}\nH 0 1\n"
    );

    // Rolling again finds nothing left to move.
    assert_eq!(circuit.clone().with_rolled_loop_rotations(), circuit);
}

#[test]
fn test_loop_rotation_not_rolled_past_feedback() {
    // The rotation would commute back behind the feedback on the next sweep.
    let source = "REPEAT 2 {\n    CZ rec[-1] 0\n    TICK\n    H 0\n    TICK\n}\n";
    let circuit = layered(source).with_rolled_loop_rotations();
    assert_eq!(circuit.layers.len(), 1);
    assert_eq!(text(&circuit), source);
}

#[test]
fn test_loop_rotation_rolling_needs_other_layers() {
    let source = "REPEAT 2 {\n    H 0\n    DETECTOR rec[-1]\n    TICK\n}\n";
    let circuit = layered(source).with_rolled_loop_rotations();
    assert_eq!(circuit.layers.len(), 1);
}

#[test]
fn test_rotations_merge_earlier() {
    let circuit = layered("H 0\nTICK\nM 1\nTICK\nH_XY 0\n").with_rotations_merged_earlier();
    assert_eq!(text(&circuit), "C_ZYX 0\nTICK\nM 1\n");

    let circuit = layered("H 0\nTICK\nM 1\nTICK\nH 0\nTICK\nM 0\n").with_rotations_merged_earlier();
    assert_eq!(text(&circuit), "M 1\nTICK\nM 0\n");

    // Blocked by a layer touching the qubit.
    let circuit = layered("H 0\nTICK\nM 0\nTICK\nH 0\n").with_rotations_merged_earlier();
    assert_eq!(circuit.layers.len(), 3);
}

#[test]
fn test_vacuous_rotations_removed() {
    let circuit = LayerCircuit::from_layers([
        rot(&[(0, Rotation::IDENTITY)]),
        Layer::Loop(LoopLayer::new(
            LayerCircuit::from_layers([rot(&[]), rot(&[(1, Rotation::H)])]),
            2,
        )),
    ])
    .without_vacuous_rotations();
    assert_eq!(circuit.layers.len(), 1);
    let Layer::Loop(lp) = &circuit.layers[0] else {
        panic!("expected loop");
    };
    assert_eq!(lp.body.layers, vec![rot(&[(1, Rotation::H)])]);
}

#[test]
fn test_rotations_before_resets_removed() {
    let circuit =
        layered("H 0 1\nTICK\nM 1\nTICK\nR 0\n").with_rotations_before_resets_removed();
    assert_eq!(text(&circuit), "H 1\nTICK\nM 1\nTICK\nR 0\n");
}

#[test]
fn test_rotation_inside_loop_before_reset() {
    let circuit = layered("REPEAT 2 {\n    H 0\n    TICK\n    R 0\n    TICK\n    M 0\n    TICK\n}\n")
        .with_rotations_before_resets_removed();
    assert_eq!(text(&circuit), "REPEAT 2 {\n    R 0\n    TICK\n    M 0\n    TICK\n}\n");
}

#[test]
fn test_irrelevant_tail_removed() {
    let circuit = layered("M 0\nTICK\nH 0\nTICK\nCZ 0 1\nTICK\nR 0\n")
        .with_irrelevant_tail_layers_removed();
    assert_eq!(text(&circuit), "M 0\n");

    let circuit = layered("M 0\nTICK\nH 0\nSHIFT_COORDS(0, 1)\n").with_irrelevant_tail_layers_removed();
    assert_eq!(text(&circuit), "M 0\nSHIFT_COORDS(0, 1)\n");
}

#[test]
fn test_qubit_coords_hoisted_with_shift() {
    let circuit = layered(
        "QUBIT_COORDS(0, 0) 0\nSHIFT_COORDS(1, 2)\nH 0\nTICK\nQUBIT_COORDS(1, 1) 1\n",
    )
    .with_qubit_coords_at_start();
    assert_eq!(
        text(&circuit),
        "QUBIT_COORDS(0, 0) 0\nQUBIT_COORDS(2, 3) 1\nSHIFT_COORDS(1, 2)\nH 0\n"
    );
}

#[test]
fn test_coord_shift_through_loops() {
    let circuit = layered("REPEAT 3 {\n    SHIFT_COORDS(0, 1)\n    M 0\n    TICK\n}\nQUBIT_COORDS(5) 0\n");
    assert_eq!(circuit.total_coord_shift(), vec![0.0, 3.0]);
    let hoisted = circuit.with_qubit_coords_at_start();
    let Layer::QubitCoordAnnotation(c) = &hoisted.layers[0] else {
        panic!("expected coords first");
    };
    assert_eq!(c.coords[&QubitId(0)], vec![5.0]);
}
