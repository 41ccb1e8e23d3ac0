use crate::cli::{Commands, ListKind, OutputFormat};
use crate::config::Arena2Config;
use crate::content::Arena2;
use crate::validation::Check;
use anyhow::{Context, Result, bail};
use daggerfall_formats::blocks::BlockKind;
use daggerfall_formats::maps::{Location, Region};
use daggerfall_formats::mesh::Mesh;
use serde_json::{Value, json};
use std::io::Write;
use tracing::info;

pub fn handle(
    command: &Commands,
    config: &Arena2Config,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let arena2 = Arena2::new(config.clone());
    match command {
        Commands::Validate => validate(&arena2, format, out),
        Commands::List { kind } => list(&arena2, *kind, format, out),
        Commands::Sound { index, out: path } => {
            let sound = arena2.sounds()?.sound(*index)?;
            std::fs::write(path, sound.to_wave())
                .with_context(|| format!("writing {}", path.display()))?;
            info!("Wrote sound {} to {}", index, path.display());
            emit(
                format,
                out,
                &json!({
                    "index": index,
                    "name": sound.name,
                    "samples": sound.wave_data.len(),
                    "seconds": sound.duration().as_secs_f64(),
                    "path": path,
                }),
                |out| {
                    writeln!(
                        out,
                        "Sound {} ({} samples, {:.2}s) written to {}",
                        index,
                        sound.wave_data.len(),
                        sound.duration().as_secs_f64(),
                        path.display()
                    )
                },
            )
        }
        Commands::Mesh { object_id } => {
            let Some(mesh) = arena2.meshes()?.mesh_by_id(*object_id)? else {
                bail!("no mesh with object id {object_id}");
            };
            emit(format, out, &mesh_json(&mesh), |out| mesh_text(&mesh, out))
        }
        Commands::Region { index } => {
            let region = arena2.maps()?.region(*index)?;
            emit(format, out, &region_json(&region), |out| {
                region_text(&region, out)
            })
        }
        Commands::Location { region, index } => {
            let location = arena2.maps()?.location(*region, *index)?;
            emit(format, out, &location_json(&location), |out| {
                location_text(&location, out)
            })
        }
        Commands::Texture {
            archive,
            record,
            dump,
        } => texture(&arena2, *archive, *record, *dump, format, out),
    }
}

/// Write `value` as JSON, or run `text` for the plain-text report
fn emit<F>(format: OutputFormat, out: &mut dyn Write, value: &Value, text: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
{
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
        }
        OutputFormat::Text => text(out)?,
    }
    Ok(())
}

fn validate(arena2: &Arena2, format: OutputFormat, out: &mut dyn Write) -> Result<()> {
    let result = arena2.validate();
    emit(format, out, &serde_json::to_value(&result)?, |out| {
        writeln!(out, "ARENA2: {}", arena2.root().display())?;
        writeln!(
            out,
            "  directory: {}",
            if result.path_exists { "found" } else { "missing" }
        )?;
        for check in Check::ALL {
            writeln!(
                out,
                "  {:<9} {}",
                check.to_string(),
                if result.passed(check) { "ok" } else { "FAILED" }
            )?;
        }
        writeln!(out, "  texture banks: {}", result.texture_count)
    })?;

    if !result.appears_valid {
        let failed: Vec<String> = result.failed_checks().iter().map(ToString::to_string).collect();
        bail!("ARENA2 directory is not valid: {}", failed.join(", "));
    }
    Ok(())
}

fn list(arena2: &Arena2, kind: ListKind, format: OutputFormat, out: &mut dyn Write) -> Result<()> {
    let rows: Vec<Value> = match kind {
        ListKind::Sounds | ListKind::Meshes => {
            let archive = if kind == ListKind::Sounds {
                arena2.sounds()?.archive().records().collect::<Vec<_>>()
            } else {
                arena2.meshes()?.archive().records().collect()
            };
            archive
                .into_iter()
                .map(|info| {
                    json!({
                        "index": info.index,
                        "id": info.id,
                        "name": info.name,
                        "length": info.length,
                    })
                })
                .collect()
        }
        ListKind::Blocks => arena2
            .blocks()?
            .blocks()
            .map(|block| {
                json!({
                    "index": block.index,
                    "name": block.name,
                    "kind": block_kind(block.kind),
                    "length": block.length,
                })
            })
            .collect(),
        ListKind::Regions => {
            let maps = arena2.maps()?;
            (0..maps.region_count())
                .map(|index| -> Result<Value> {
                    let region = maps.region(index)?;
                    Ok(json!({
                        "index": index,
                        "name": region.name,
                        "locations": region.location_count(),
                    }))
                })
                .collect::<Result<Vec<_>>>()?
        }
    };

    emit(format, out, &Value::Array(rows.clone()), |out| {
        for row in &rows {
            let fields: Vec<String> = row
                .as_object()
                .into_iter()
                .flatten()
                .map(|(key, value)| format!("{key}={}", plain(value)))
                .collect();
            writeln!(out, "{}", fields.join(" "))?;
        }
        writeln!(out, "{} records", rows.len())
    })
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

const fn block_kind(kind: BlockKind) -> &'static str {
    match kind {
        BlockKind::Exterior => "exterior",
        BlockKind::Dungeon => "dungeon",
        BlockKind::Interior => "interior",
        BlockKind::Unknown => "unknown",
    }
}

fn version_tag(mesh: &Mesh) -> String {
    String::from_utf8_lossy(&mesh.version.tag()).into_owned()
}

fn mesh_json(mesh: &Mesh) -> Value {
    json!({
        "object_id": mesh.object_id,
        "version": version_tag(mesh),
        "radius": mesh.radius,
        "total_vertices": mesh.total_vertices,
        "faces": mesh.face_count(),
        "sub_meshes": mesh.sub_meshes.iter().map(|s| json!({
            "texture_archive": s.texture_archive(),
            "texture_record": s.texture_record(),
            "faces": s.faces.len(),
            "vertices": s.vertex_count(),
        })).collect::<Vec<_>>(),
    })
}

fn mesh_text(mesh: &Mesh, out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        out,
        "Mesh {} ({}): radius {}, {} vertices, {} faces",
        mesh.object_id,
        version_tag(mesh),
        mesh.radius,
        mesh.total_vertices,
        mesh.face_count()
    )?;
    for sub_mesh in &mesh.sub_meshes {
        writeln!(
            out,
            "  TEXTURE.{:03} record {}: {} faces, {} vertices",
            sub_mesh.texture_archive(),
            sub_mesh.texture_record(),
            sub_mesh.faces.len(),
            sub_mesh.vertex_count()
        )?;
    }
    Ok(())
}

fn region_json(region: &Region) -> Value {
    json!({
        "index": region.index,
        "name": region.name,
        "locations": region.location_names.iter().zip(&region.map_table).map(|(name, entry)| json!({
            "name": name,
            "map_id": entry.map_id(),
            "type": format!("{:?}", entry.location_type()),
            "longitude": entry.longitude(),
            "latitude": entry.latitude,
            "discovered": entry.discovered(),
            "hidden": entry.hidden(),
        })).collect::<Vec<_>>(),
    })
}

fn region_text(region: &Region, out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        out,
        "Region {} {}: {} locations",
        region.index,
        region.name,
        region.location_count()
    )?;
    for (index, (name, entry)) in region
        .location_names
        .iter()
        .zip(&region.map_table)
        .enumerate()
    {
        writeln!(
            out,
            "  {index:>4} {name:<32} {:?}",
            entry.location_type()
        )?;
    }
    Ok(())
}

fn location_json(location: &Location) -> Value {
    let header = &location.element.header;
    json!({
        "region": location.region_index,
        "region_name": location.region_name,
        "index": location.location_index,
        "name": location.name,
        "location_id": header.location_id,
        "x": header.x,
        "y": header.y,
        "type": format!("{:?}", location.map_table.location_type()),
        "doors": location.element.doors.len(),
        "post_records": location.element.post_records.iter().map(hex::encode).collect::<Vec<_>>(),
        "dungeon": location.dungeon.as_ref().map(|dungeon| json!({
            "blocks": dungeon.blocks.iter().map(|b| json!({
                "x": b.x,
                "z": b.z,
                "number": b.block_number,
                "starting": b.is_starting_block,
                "name": b.block_name,
            })).collect::<Vec<_>>(),
        })),
    })
}

fn location_text(location: &Location, out: &mut dyn Write) -> std::io::Result<()> {
    let header = &location.element.header;
    writeln!(
        out,
        "{} ({}, location {}): {:?} at ({}, {}), id {}",
        location.name,
        location.region_name,
        location.location_index,
        location.map_table.location_type(),
        header.x,
        header.y,
        header.location_id
    )?;
    writeln!(
        out,
        "  {} doors, {} post records",
        location.element.doors.len(),
        location.element.post_records.len()
    )?;
    for record in &location.element.post_records {
        writeln!(out, "    {}", hex::encode(record))?;
    }
    match &location.dungeon {
        Some(dungeon) => {
            writeln!(out, "  dungeon: {} blocks", dungeon.blocks.len())?;
            for block in &dungeon.blocks {
                writeln!(
                    out,
                    "    ({:>3}, {:>3}) {}{}",
                    block.x,
                    block.z,
                    block.block_name.as_deref().unwrap_or("?"),
                    if block.is_starting_block {
                        " (start)"
                    } else {
                        ""
                    }
                )?;
            }
        }
        None => writeln!(out, "  no dungeon")?,
    }
    Ok(())
}

fn texture(
    arena2: &Arena2,
    archive: u16,
    record: usize,
    dump: bool,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let file = arena2.texture(archive)?;
    let header = *file.record_header(record)?;
    let image = file.image(record)?;

    let rows: Vec<String> = if dump {
        image.pixels.chunks(image.width.max(1)).map(hex::encode).collect()
    } else {
        Vec::new()
    };

    emit(
        format,
        out,
        &json!({
            "archive": archive,
            "bank": file.name(),
            "record": record,
            "width": image.width,
            "height": image.height,
            "offset_x": image.offset_x,
            "offset_y": image.offset_y,
            "compression": format!("{:?}", header.compression()),
            "frames": header.frame_count,
            "rows": rows,
        }),
        |out| {
            writeln!(
                out,
                "TEXTURE.{:03} \"{}\" record {}: {}x{}, {} frame(s)",
                archive,
                file.name(),
                record,
                image.width,
                image.height,
                header.frame_count
            )?;
            for row in &rows {
                writeln!(out, "  {row}")?;
            }
            Ok(())
        },
    )
}
