//! 配置校验模块
//!
//! 校验规则：
//! - 字段级规则 (validator derive)
//! - route kind 连续且唯一 (0..ROUTE_COUNT)
//! - 非 discard route 的 target 唯一、非空、为相对文件名
//! - terminal / checkpoint kind 在范围内、互不相同、不指向 discard
//! - status_file 不与任何 target 冲突

use std::collections::HashSet;

use contracts::{DemuxError, StreamLayout, WriteDiscipline};
use ::validator::Validate;

/// 校验 StreamLayout 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(layout: &StreamLayout) -> Result<(), DemuxError> {
    validate_fields(layout)?;
    validate_route_kinds(layout)?;
    validate_targets(layout)?;
    validate_markers(layout)?;
    validate_status_file(layout)?;
    Ok(())
}

/// 字段级校验
fn validate_fields(layout: &StreamLayout) -> Result<(), DemuxError> {
    layout
        .validate()
        .map_err(|e| DemuxError::config_validation("layout", e.to_string().replace('\n', "; ")))
}

/// 校验 route kind 连续且唯一
fn validate_route_kinds(layout: &StreamLayout) -> Result<(), DemuxError> {
    let mut seen = HashSet::new();
    for route in &layout.routes {
        if !seen.insert(route.kind) {
            return Err(DemuxError::config_validation(
                format!("routes[kind={}]", route.kind),
                "duplicate route kind",
            ));
        }
    }

    let count = layout.routes.len() as u32;
    if let Some(route) = layout.routes.iter().find(|r| r.kind >= count) {
        return Err(DemuxError::config_validation(
            format!("routes[kind={}]", route.kind),
            format!("route kinds must cover 0..{count} without gaps"),
        ));
    }
    Ok(())
}

/// 校验 target 命名
fn validate_targets(layout: &StreamLayout) -> Result<(), DemuxError> {
    let mut seen = HashSet::new();
    for route in &layout.routes {
        let field = format!("routes[kind={}].target", route.kind);
        match (route.discipline, route.target.as_deref()) {
            (WriteDiscipline::Discard, Some(_)) => {
                return Err(DemuxError::config_validation(
                    field,
                    "discard routes must not name a target",
                ));
            }
            (WriteDiscipline::Discard, None) => {}
            (_, None) => {
                return Err(DemuxError::config_validation(
                    field,
                    "append/overwrite routes require a target",
                ));
            }
            (_, Some(target)) => {
                check_relative_name(&field, target)?;
                if !seen.insert(target) {
                    return Err(DemuxError::config_validation(
                        field,
                        format!("duplicate target '{target}'"),
                    ));
                }
            }
        }
    }
    Ok(())
}

/// 校验 terminal / checkpoint kind
fn validate_markers(layout: &StreamLayout) -> Result<(), DemuxError> {
    let stream = &layout.stream;

    if stream.terminal_kind == stream.checkpoint_kind {
        return Err(DemuxError::config_validation(
            "stream.terminal_kind / stream.checkpoint_kind",
            format!(
                "terminal and checkpoint markers must differ, both are {}",
                stream.terminal_kind
            ),
        ));
    }

    for (field, kind) in [
        ("stream.terminal_kind", stream.terminal_kind),
        ("stream.checkpoint_kind", stream.checkpoint_kind),
    ] {
        let route = layout.routes.iter().find(|r| r.kind == kind).ok_or_else(|| {
            DemuxError::config_validation(field, format!("kind {kind} not found in routes"))
        })?;
        if route.discipline == WriteDiscipline::Discard {
            return Err(DemuxError::config_validation(
                field,
                format!("kind {kind} routes to the discard target"),
            ));
        }
    }
    Ok(())
}

/// 校验 status_file
fn validate_status_file(layout: &StreamLayout) -> Result<(), DemuxError> {
    let status = layout.stream.status_file.as_str();
    check_relative_name("stream.status_file", status)?;

    if layout
        .routes
        .iter()
        .any(|r| r.target.as_deref() == Some(status))
    {
        return Err(DemuxError::config_validation(
            "stream.status_file",
            format!("status file '{status}' collides with a route target"),
        ));
    }
    Ok(())
}

fn check_relative_name(field: &str, name: &str) -> Result<(), DemuxError> {
    if name.is_empty() {
        return Err(DemuxError::config_validation(field, "name cannot be empty"));
    }
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(DemuxError::config_validation(
            field,
            format!("'{name}' must be a plain file name inside the output root"),
        ));
    }
    Ok(())
}
