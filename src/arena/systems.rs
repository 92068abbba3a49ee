//! Systems building, reshaping, and disposing the arena.
use bevy::{
    image::{ImageAddressMode, ImageLoaderSettings, ImageSampler, ImageSamplerDescriptor},
    math::Affine2,
    prelude::*,
};

use crate::{
    arena::{
        components::{Arena, ArenaPart, ArenaResources, ArenaSurface, ArenaTextures},
        shapes::{boundary_mesh, ground_mesh, lava_field_mesh},
    },
    core::{config::GameConfig, session::SessionScoped, SimulationClock},
    scene::AssetSlot,
};

const DIFFUSE_TEXTURE: &str = "textures/arena/diffuse.png";
const NORMAL_TEXTURE: &str = "textures/arena/normal.png";
const ROUGHNESS_TEXTURE: &str = "textures/arena/roughness.png";
const DISPLACEMENT_TEXTURE: &str = "textures/arena/displacement.png";

/// Ground tint while the diffuse texture is unavailable.
const GROUND_FALLBACK_COLOR: Color = Color::srgb(0.2, 0.2, 0.2);
/// Reflectance at environment intensity 1.
const BASE_REFLECTANCE: f32 = 0.5;
/// Parallax depth at displacement scale 1.
const PARALLAX_DEPTH_PER_UNIT: f32 = 0.1;
/// The lava field sits just below the ground so the ground corners cover it.
const LAVA_FIELD_DEPTH: f32 = -0.05;

fn load_repeating(asset_server: &AssetServer, path: &'static str, srgb: bool) -> Handle<Image> {
    asset_server.load_with_settings(path, move |settings: &mut ImageLoaderSettings| {
        settings.is_srgb = srgb;
        settings.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
            address_mode_u: ImageAddressMode::Repeat,
            address_mode_v: ImageAddressMode::Repeat,
            ..ImageSamplerDescriptor::linear()
        });
    })
}

/// Requests the ground textures once; rebuilds reuse the handles.
pub fn load_arena_textures(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(ArenaTextures {
        diffuse: load_repeating(&asset_server, DIFFUSE_TEXTURE, true),
        normal: load_repeating(&asset_server, NORMAL_TEXTURE, false),
        roughness: load_repeating(&asset_server, ROUGHNESS_TEXTURE, false),
        displacement: load_repeating(&asset_server, DISPLACEMENT_TEXTURE, false),
    });
}

fn loaded(images: Option<&Assets<Image>>, handle: &Handle<Image>) -> Option<Handle<Image>> {
    images
        .is_some_and(|images| images.contains(handle))
        .then(|| handle.clone())
}

/// Only textures that finished loading are bound; a material waiting on a missing
/// image would never render.
fn apply_ground_surface(
    material: &mut StandardMaterial,
    surface: &ArenaSurface,
    textures: Option<&ArenaTextures>,
    images: Option<&Assets<Image>>,
) {
    material.base_color_texture = textures.and_then(|t| loaded(images, &t.diffuse));
    material.normal_map_texture = textures.and_then(|t| loaded(images, &t.normal));
    material.metallic_roughness_texture = textures.and_then(|t| loaded(images, &t.roughness));
    material.depth_map = textures.and_then(|t| loaded(images, &t.displacement));

    material.base_color = if material.base_color_texture.is_some() {
        Color::WHITE
    } else {
        GROUND_FALLBACK_COLOR
    };
    material.uv_transform = Affine2::from_scale(Vec2::splat(surface.texture_repeat));
    material.parallax_depth_scale = surface.displacement_scale * PARALLAX_DEPTH_PER_UNIT;
    material.metallic = surface.metalness;
    material.perceptual_roughness = surface.roughness;
    material.reflectance = BASE_REFLECTANCE * surface.env_intensity;
}

fn apply_lava_surface(material: &mut StandardMaterial, surface: &ArenaSurface) {
    material.base_color = surface.lava_color.with_alpha(surface.lava_opacity);
    material.emissive = surface.lava_color.to_linear() * surface.lava_emissive_intensity;
    material.alpha_mode = AlphaMode::Blend;
}

/// Spawns the arena root with its ground, lava field, and boundary parts.
pub fn spawn_arena(
    mut commands: Commands,
    config: Res<GameConfig>,
    textures: Option<Res<ArenaTextures>>,
    images: Option<Res<Assets<Image>>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut arena = Arena::from_settings(&config.arena);

    let ground_mesh = meshes.add(ground_mesh(&arena));
    let lava_field_mesh = meshes.add(lava_field_mesh(&arena));
    let boundary_mesh = meshes.add(boundary_mesh(&arena));

    let mut ground = StandardMaterial::default();
    apply_ground_surface(
        &mut ground,
        arena.surface(),
        textures.as_deref(),
        images.as_deref(),
    );
    let ground_material = materials.add(ground);

    let mut lava = StandardMaterial::default();
    apply_lava_surface(&mut lava, arena.surface());
    let lava_material = materials.add(lava);

    arena.clear_shape_dirty();
    arena.clear_surface_dirty();
    let size = arena.size();

    let root = commands
        .spawn((
            arena,
            Transform::default(),
            Visibility::default(),
            SessionScoped,
            Name::new("Arena"),
        ))
        .id();

    commands.spawn((
        Mesh3d(ground_mesh.clone()),
        MeshMaterial3d(ground_material.clone()),
        Transform::default(),
        ArenaPart::Ground,
        ChildOf(root),
        Name::new("Arena Ground"),
    ));

    commands.spawn((
        Mesh3d(lava_field_mesh.clone()),
        MeshMaterial3d(lava_material.clone()),
        Transform::from_xyz(0.0, LAVA_FIELD_DEPTH, 0.0),
        ArenaPart::LavaField,
        ChildOf(root),
        Name::new("Lava Field"),
    ));

    commands.spawn((
        Mesh3d(boundary_mesh.clone()),
        MeshMaterial3d(lava_material.clone()),
        Transform::default(),
        ArenaPart::Boundary,
        ChildOf(root),
        Name::new("Lava Boundary"),
    ));

    commands.insert_resource(ArenaResources {
        root: Some(root),
        ground_mesh: AssetSlot::new(ground_mesh),
        lava_field_mesh: AssetSlot::new(lava_field_mesh),
        boundary_mesh: AssetSlot::new(boundary_mesh),
        ground_material: AssetSlot::new(ground_material),
        lava_material: AssetSlot::new(lava_material),
    });

    info!("Arena spawned at size {:.1}", size);
}

/// Shrinks the arena at the configured rate. A rate of zero leaves it alone.
pub fn shrink_arena(clock: Res<SimulationClock>, mut arenas: Query<&mut Arena>) {
    let Ok(mut arena) = arenas.single_mut() else {
        return;
    };
    let rate = arena.shrink_per_second();
    if rate <= 0.0 {
        return;
    }
    arena.shrink(rate * clock.delta_secs());
}

/// Replaces all three meshes after a shape change, removing the previous ones.
pub fn rebuild_arena_shapes(
    mut arenas: Query<&mut Arena>,
    resources: Option<ResMut<ArenaResources>>,
    mut parts: Query<(&ArenaPart, &mut Mesh3d)>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let Some(mut resources) = resources else {
        return;
    };
    let Ok(mut arena) = arenas.single_mut() else {
        return;
    };
    if !arena.shape_dirty() {
        return;
    }

    let ground = meshes.add(ground_mesh(&arena));
    let ground = resources.ground_mesh.replace(ground, &mut meshes);
    let lava_field = meshes.add(lava_field_mesh(&arena));
    let lava_field = resources.lava_field_mesh.replace(lava_field, &mut meshes);
    let boundary = meshes.add(boundary_mesh(&arena));
    let boundary = resources.boundary_mesh.replace(boundary, &mut meshes);

    for (part, mut mesh) in parts.iter_mut() {
        mesh.0 = match part {
            ArenaPart::Ground => ground.clone(),
            ArenaPart::LavaField => lava_field.clone(),
            ArenaPart::Boundary => boundary.clone(),
        };
    }

    arena.clear_shape_dirty();
    info!(
        "Arena rebuilt at size {:.1} (lava width {:.2})",
        arena.size(),
        arena.lava_width()
    );
}

/// Marks the surface dirty when one of the ground textures finishes loading.
pub fn refresh_loaded_textures(
    mut events: MessageReader<AssetEvent<Image>>,
    textures: Option<Res<ArenaTextures>>,
    mut arenas: Query<&mut Arena>,
) {
    let Some(textures) = textures else {
        events.clear();
        return;
    };

    let ours = [
        textures.diffuse.id(),
        textures.normal.id(),
        textures.roughness.id(),
        textures.displacement.id(),
    ];
    let any_loaded = events.read().any(|event| match event {
        AssetEvent::LoadedWithDependencies { id } => ours.contains(id),
        _ => false,
    });

    if any_loaded {
        if let Ok(mut arena) = arenas.single_mut() {
            arena.mark_surface_dirty();
        }
    }
}

/// Writes the surface parameters into the existing ground and lava materials.
pub fn apply_arena_materials(
    mut arenas: Query<&mut Arena>,
    resources: Option<Res<ArenaResources>>,
    textures: Option<Res<ArenaTextures>>,
    images: Option<Res<Assets<Image>>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(resources) = resources else {
        return;
    };
    let Ok(mut arena) = arenas.single_mut() else {
        return;
    };
    if !arena.surface_dirty() {
        return;
    }

    if let Some(material) = resources
        .ground_material
        .handle()
        .and_then(|handle| materials.get_mut(handle))
    {
        apply_ground_surface(
            material,
            arena.surface(),
            textures.as_deref(),
            images.as_deref(),
        );
    }
    if let Some(material) = resources
        .lava_material
        .handle()
        .and_then(|handle| materials.get_mut(handle))
    {
        apply_lava_surface(material, arena.surface());
    }

    arena.clear_surface_dirty();
}

/// Teardown: despawns the arena and removes its meshes and materials.
pub fn dispose_arena(
    mut commands: Commands,
    resources: Option<ResMut<ArenaResources>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(mut resources) = resources else {
        return;
    };
    if resources.release(&mut commands, &mut meshes, &mut materials) {
        info!("Arena disposed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::shapes::mesh_extents;
    use bevy::ecs::system::RunSystemOnce;
    use std::time::Duration;

    fn arena_app(config: GameConfig) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Mesh>()
            .init_asset::<StandardMaterial>()
            .init_asset::<Image>()
            .insert_resource(config)
            .insert_resource(SimulationClock::default())
            .add_systems(Startup, spawn_arena)
            .add_systems(
                Update,
                (shrink_arena, rebuild_arena_shapes, apply_arena_materials).chain(),
            );
        app.update();
        app
    }

    fn with_arena(app: &mut App, f: impl FnOnce(&mut Arena)) {
        let mut query = app.world_mut().query::<&mut Arena>();
        let mut arena = query.single_mut(app.world_mut()).expect("arena");
        f(&mut *arena);
    }

    fn part_extent(app: &mut App, wanted: ArenaPart) -> f32 {
        let mut query = app.world_mut().query::<(&ArenaPart, &Mesh3d)>();
        let handle = query
            .iter(app.world())
            .find(|(part, _)| **part == wanted)
            .map(|(_, mesh)| mesh.0.clone())
            .expect("part");
        let mesh = app
            .world()
            .resource::<Assets<Mesh>>()
            .get(&handle)
            .expect("mesh alive");
        mesh_extents(mesh).0
    }

    #[test]
    fn resizing_keeps_exactly_three_meshes() {
        let mut app = arena_app(GameConfig::default());

        with_arena(&mut app, |arena| arena.set_size(50.0));
        app.update();
        with_arena(&mut app, |arena| arena.set_size(80.0));
        app.update();

        assert_eq!(app.world().resource::<Assets<Mesh>>().len(), 3);

        let mut query = app.world_mut().query::<&Arena>();
        let arena = query.single(app.world()).expect("arena").clone();
        assert_eq!(arena.size(), 80.0);
        assert!(!arena.shape_dirty());

        let corner = 40.0 * std::f32::consts::SQRT_2;
        assert!((part_extent(&mut app, ArenaPart::Ground) - corner).abs() < 1e-3);
        assert!(
            (part_extent(&mut app, ArenaPart::LavaField) - arena.lava_outer_radius()).abs()
                < 1e-3
        );
        assert!(
            (part_extent(&mut app, ArenaPart::Boundary)
                - (40.0 + arena.boundary_minor_radius()))
            .abs()
                < 1e-3
        );
    }

    #[test]
    fn surface_changes_mutate_existing_materials() {
        let mut app = arena_app(GameConfig::default());
        let handle = app
            .world()
            .resource::<ArenaResources>()
            .lava_material
            .handle()
            .cloned()
            .expect("lava material");

        with_arena(&mut app, |arena| {
            arena.set_lava_opacity(0.25);
            arena.set_lava_emissive_intensity(0.0);
        });
        app.update();

        assert_eq!(app.world().resource::<Assets<StandardMaterial>>().len(), 2);
        let material = app
            .world()
            .resource::<Assets<StandardMaterial>>()
            .get(&handle)
            .expect("same material");
        assert!((material.base_color.alpha() - 0.25).abs() < 1e-6);
        let emissive = material.emissive;
        assert_eq!([emissive.red, emissive.green, emissive.blue], [0.0; 3]);
    }

    #[test]
    fn arena_shrinks_with_clock() {
        let mut config = GameConfig::default();
        config.arena.size = 100.0;
        config.arena.shrink_per_second = 10.0;
        let mut app = arena_app(config);

        {
            let mut clock = app.world_mut().resource_mut::<SimulationClock>();
            clock.tick(Duration::ZERO);
            clock.tick(Duration::from_millis(250));
        }
        app.update();
        app.world_mut()
            .resource_mut::<SimulationClock>()
            .tick(Duration::from_millis(250));
        app.update();

        let mut query = app.world_mut().query::<&Arena>();
        let size = query.single(app.world()).expect("arena").size();
        assert!((size - 95.0).abs() < 1e-4);
    }

    #[test]
    fn dispose_is_idempotent() {
        let mut app = arena_app(GameConfig::default());
        assert_eq!(app.world().resource::<Assets<Mesh>>().len(), 3);

        app.world_mut()
            .run_system_once(dispose_arena)
            .expect("first dispose");
        app.world_mut()
            .run_system_once(dispose_arena)
            .expect("second dispose");

        assert_eq!(app.world().resource::<Assets<Mesh>>().len(), 0);
        assert_eq!(app.world().resource::<Assets<StandardMaterial>>().len(), 0);
        let mut parts = app.world_mut().query::<&ArenaPart>();
        assert_eq!(parts.iter(app.world()).count(), 0);
        let mut arenas = app.world_mut().query::<&Arena>();
        assert_eq!(arenas.iter(app.world()).count(), 0);
    }
}
