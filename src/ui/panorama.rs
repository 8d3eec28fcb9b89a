use iced::widget::{button, column, container, horizontal_space, image, row, text};
use iced::{Alignment, ContentFit, Element, Length};

use crate::state::session::Viewing;
use crate::viewer::StillPanorama;
use crate::Message;

/// The viewer screen: close button on top, panorama below
pub fn view(viewing: &Viewing<StillPanorama>) -> Element<'_, Message> {
    let widget = viewing.viewer.widget();

    let header = row![
        button(text("✕").size(20)).on_press(Message::CloseViewer).padding(10),
        text(&viewing.tour.name).size(18),
        horizontal_space(),
        text(format!(
            "yaw {:.0}°  pitch {:.0}°  fov {:.0}°",
            widget.yaw(),
            widget.pitch(),
            widget.hfov()
        ))
        .size(12),
    ]
    .spacing(10)
    .padding(10)
    .align_y(Alignment::Center);

    let body: Element<'_, Message> = match widget.frame() {
        Some(frame) => image(frame.clone())
            .width(Length::Fill)
            .height(Length::Fill)
            .content_fit(ContentFit::Cover)
            .into(),
        None => container(text("Loading…"))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into(),
    };

    column![header, body].into()
}
