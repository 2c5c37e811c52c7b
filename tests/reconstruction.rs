use std::ops::ControlFlow;

use rstest::rstest;
#[allow(unused)] use pretty_assertions::{assert_eq, assert_ne};

use tomo::{
    Algorithm, AnyProjector, Image, ParallelGeometry, Parameters, ProjectorKind, Volume,
    forward_projection, reconstruct_with, residual_norm,
};

/// A disc with a denser square inside it, in a 16x16 volume.
fn phantom(volume: Volume<2>) -> Image<2> {
    let centre = volume.centre();
    Image::from_fn(volume, |p| {
        let d = p - centre;
        if d.x.abs() < 2.0 && d.y.abs() < 2.0 { 2.0 }
        else if d.norm() < 6.0               { 1.0 }
        else                                 { 0.0 }
    })
}

/// Residual norms of the starting (empty) image and after each of 5 sweeps.
fn residuals<const D: usize>(algorithm: Algorithm, kind: ProjectorKind, geometry: &ParallelGeometry<D>, truth: &Image<D>) -> Vec<f32> {
    let volume = *truth.volume();
    let projector = AnyProjector::new(kind, volume);
    let sinogram = forward_projection(truth, geometry, &projector).unwrap();

    let mut image = Image::zeros(volume);
    let mut residuals = vec![residual_norm(&image, &sinogram, geometry, &projector).unwrap()];
    let parameters = Parameters { beta: 0.5, iterations: 5 };
    let done = reconstruct_with(algorithm, geometry, &projector, &sinogram, &mut image, parameters, |_, image| {
        residuals.push(residual_norm(image, &sinogram, geometry, &projector).unwrap());
        ControlFlow::Continue(())
    }).unwrap();
    assert_eq!(done, 5);
    residuals
}

fn assert_decreasing(residuals: &[f32], context: &str) {
    assert_eq!(residuals.len(), 6);
    for pair in residuals.windows(2) {
        // Allow for rounding once the residual stops moving
        assert!(pair[1] <= pair[0] * (1.0 + 1e-4), "{context}: {residuals:?}");
    }
    assert!(residuals[5] < residuals[0], "{context}: {residuals:?}");
}

#[rstest(
    algorithm => [Algorithm::Art, Algorithm::Sart, Algorithm::Sirt],
    kind      => [ProjectorKind::Closest, ProjectorKind::Linear, ProjectorKind::Joseph],
)]
fn residual_decreases(algorithm: Algorithm, kind: ProjectorKind) {
    let volume = Volume::<2>::cubic(16).unwrap();
    let geometry = ParallelGeometry::new(16, 16, volume).unwrap();
    let residuals = residuals(algorithm, kind, &geometry, &phantom(volume));
    assert_decreasing(&residuals, &format!("{algorithm:?}/{kind:?}"));
}

#[rstest(
    algorithm => [Algorithm::Art, Algorithm::Sart, Algorithm::Sirt],
    kind      => [ProjectorKind::Closest, ProjectorKind::Linear, ProjectorKind::Joseph],
)]
fn residual_decreases_in_3d(algorithm: Algorithm, kind: ProjectorKind) {
    let volume = Volume::<3>::cubic(8).unwrap();
    let geometry = ParallelGeometry::new(8, 8, volume).unwrap();
    let centre = volume.centre();
    let ball = Image::from_fn(volume, |p| if (p - centre).norm() < 3.0 { 1.0 } else { 0.0 });
    let residuals = residuals(algorithm, kind, &geometry, &ball);
    assert_decreasing(&residuals, &format!("3D {algorithm:?}/{kind:?}"));
}

#[rstest(algorithm => [Algorithm::Art, Algorithm::Sart, Algorithm::Sirt])]
fn callback_can_stop_reconstruction(algorithm: Algorithm) {
    let volume = Volume::<2>::cubic(8).unwrap();
    let geometry = ParallelGeometry::new(4, 8, volume).unwrap();
    let projector = AnyProjector::new(ProjectorKind::Linear, volume);
    let sinogram = forward_projection(&Image::ones(volume), &geometry, &projector).unwrap();

    let mut image = Image::zeros(volume);
    let mut seen = vec![];
    let parameters = Parameters { beta: 1.0, iterations: 10 };
    let done = reconstruct_with(algorithm, &geometry, &projector, &sinogram, &mut image, parameters, |n, _| {
        seen.push(n);
        if n == 2 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
    }).unwrap();

    assert_eq!(done, 3);
    assert_eq!(seen, vec![0, 1, 2]);
}

#[test]
fn free_functions_match_reconstruct() {
    let volume = Volume::<2>::cubic(8).unwrap();
    let geometry = ParallelGeometry::new(6, 8, volume).unwrap();
    let projector = AnyProjector::new(ProjectorKind::Joseph, volume);
    let sinogram = forward_projection(&phantom_8(volume), &geometry, &projector).unwrap();
    let parameters = Parameters { beta: 0.5, iterations: 3 };

    let art: Image<2> = tomo::art(&geometry, &projector, &sinogram, parameters).unwrap();
    let mut image = Image::zeros(volume);
    tomo::reconstruct(Algorithm::Art, &geometry, &projector, &sinogram, &mut image, parameters).unwrap();
    // ART is sequential, so the results are identical
    assert_eq!(art, image);
}

fn phantom_8(volume: Volume<2>) -> Image<2> {
    Image::from_fn(volume, |p| if p.x > 3.0 && p.y < 5.0 { 1.0 } else { 0.0 })
}

#[test]
fn mismatched_sinogram_is_rejected() {
    let volume = Volume::<2>::cubic(8).unwrap();
    let geometry = ParallelGeometry::new(4, 8, volume).unwrap();
    let projector = AnyProjector::new(ProjectorKind::Linear, volume);
    let sinogram = tomo::Sinogram::zeros([8, 5]);
    let mut image = Image::zeros(volume);
    let result = tomo::reconstruct(Algorithm::Sirt, &geometry, &projector, &sinogram, &mut image, Parameters::default());
    assert!(matches!(result, Err(tomo::TomoError::SizeMismatch { .. })));
}
