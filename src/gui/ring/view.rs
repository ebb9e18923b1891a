use super::model::{NodeVisual, RingState};
use super::{FOCAL_RADIUS, ICON_SIZE, LABEL_FONT_SIZE, LABEL_GAP, SELECTED_SCALE};
use crate::gui::theme::ThemeColors;
use cairo::Context;
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use orrery_core::{Phase, Point, Radius};
use palette::Srgba;
use std::f64::consts::PI;
use std::iter::zip;

struct NodeRenderer<'a> {
    visual: &'a NodeVisual,
    center: Point,
    radius: f64,
    selected: bool,
    labelled: bool,
}

impl<'a> NodeRenderer<'a> {
    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let color = if self.selected {
            colors.selected
        } else {
            colors.node
        };
        set_source(cr, color);
        cr.arc(self.center.x, self.center.y, self.radius, 0.0, 2.0 * PI);
        cr.fill()?;

        if let Some(pixbuf) = &self.visual.pixbuf {
            self.draw_icon(cr, pixbuf)?;
        }
        if self.labelled {
            self.draw_label(cr, colors)?;
        }
        Ok(())
    }

    fn draw_icon(&self, cr: &Context, pixbuf: &Pixbuf) -> Result<(), cairo::Error> {
        // fit icon into node
        let icon_scale = (self.radius * 2.0 * 0.7) / ICON_SIZE as f64;
        let (iw, ih) = (
            pixbuf.width() as f64 * icon_scale,
            pixbuf.height() as f64 * icon_scale,
        );

        cr.save()?;
        cr.translate(self.center.x - iw / 2.0, self.center.y - ih / 2.0);
        cr.scale(icon_scale, icon_scale);
        cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
        cr.paint()?;
        cr.restore()
    }

    fn draw_label(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        set_source(cr, colors.label);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(LABEL_FONT_SIZE * self.radius / super::NODE_RADIUS);
        let ext = cr.text_extents(&self.visual.label)?;
        cr.move_to(
            self.center.x - ext.width() / 2.0,
            self.center.y + self.radius + LABEL_GAP + ext.height(),
        );
        cr.show_text(&self.visual.label)
    }
}

pub fn draw(cr: &Context, ring: &RingState, colors: &ThemeColors) -> Result<(), cairo::Error> {
    draw_orbit(cr, ring.center, ring.engine.radius(), colors)?;
    draw_focal_backdrop(cr, ring, colors)?;

    let interactive = ring.frame.phase == Phase::Interactive;
    let node_radius = ring.node_radius();
    for (i, (visual, center)) in zip(&ring.visuals, ring.node_centers()).enumerate() {
        let selected = interactive && ring.frame.selected_index == i;
        NodeRenderer {
            visual,
            center,
            radius: if selected {
                node_radius * SELECTED_SCALE
            } else {
                node_radius
            },
            selected,
            labelled: ring.frame.labels_visible,
        }
        .draw(cr, colors)?;
    }
    Ok(())
}

fn draw_orbit(
    cr: &Context,
    center: Point,
    radius: Radius,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    if radius.x <= 0.0 || radius.y <= 0.0 {
        return Ok(());
    }
    cr.save()?;
    cr.translate(center.x, center.y);
    cr.scale(radius.x, radius.y);
    cr.arc(0.0, 0.0, 1.0, 0.0, 2.0 * PI);
    cr.restore()?;
    set_source(cr, colors.orbit);
    cr.set_line_width(1.5);
    cr.stroke()
}

/// Halo behind the focal media, so the ring reads even before the media loads.
fn draw_focal_backdrop(
    cr: &Context,
    ring: &RingState,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    set_source(cr, colors.focal);
    cr.arc(
        ring.center.x,
        ring.center.y,
        FOCAL_RADIUS * ring.scale_factor,
        0.0,
        2.0 * PI,
    );
    cr.fill()
}

fn set_source(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}
