use iced::widget::{button, column, container, horizontal_space, image, row, scrollable, text};
use iced::{Alignment, ContentFit, Element, Length};
use iced_aw::Wrap;

use super::ACCENT;
use crate::state::catalog::CatalogManager;
use crate::state::data::{CatalogEntry, DisplayTour, VirtualTour};
use crate::Message;

const CARD_WIDTH: f32 = 220.0;
const CARD_IMAGE_HEIGHT: f32 = 220.0;

/// The catalog grid
pub fn view<'a>(catalog: &'a CatalogManager, status: &'a str, notice: Option<&'a str>) -> Element<'a, Message> {
    let header = row![
        text("3DCristi").size(28),
        text(" APP").size(28).color(ACCENT),
        horizontal_space(),
        button(text("Import")).on_press(Message::ImportTour).padding(10),
    ]
    .align_y(Alignment::Center)
    .padding(20);

    let mut cards: Vec<Element<'a, Message>> = Vec::with_capacity(catalog.entries().len() + 1);
    cards.push(add_card());

    // Cards carry their position so the click can be resolved against
    // whatever the catalog holds when it arrives
    for (index, entry) in catalog.entries().iter().enumerate() {
        let card = match entry {
            CatalogEntry::Virtual(tour) => virtual_card(tour),
            CatalogEntry::Stored(tour) => stored_card(catalog, tour),
        };
        cards.push(
            button(card)
                .on_press(Message::Select(index))
                .width(CARD_WIDTH)
                .padding(0)
                .style(button::secondary)
                .into(),
        );
    }

    let grid = Wrap::with_elements(cards).spacing(16.0).line_spacing(16.0);

    let mut content = column![header, text(status).size(14)].spacing(10).padding(20);

    if let Some(notice) = notice {
        content = content.push(
            row![
                text(notice).size(14),
                horizontal_space(),
                button(text("Dismiss")).on_press(Message::DismissNotice).style(button::danger),
            ]
            .align_y(Alignment::Center)
            .spacing(10),
        );
    }

    content
        .push(scrollable(grid).height(Length::Fill))
        .into()
}

fn add_card<'a>() -> Element<'a, Message> {
    let body = column![text("+").size(48), text("Create New Tour")]
        .spacing(8)
        .align_x(Alignment::Center);

    button(
        container(body)
            .width(CARD_WIDTH)
            .height(CARD_IMAGE_HEIGHT + 40.0)
            .center_x(Length::Fixed(CARD_WIDTH))
            .center_y(Length::Fixed(CARD_IMAGE_HEIGHT + 40.0)),
    )
    .on_press(Message::ImportTour)
    .padding(0)
    .style(button::secondary)
    .into()
}

fn stored_card<'a>(catalog: &'a CatalogManager, tour: &'a DisplayTour) -> Element<'a, Message> {
    let preview: Element<'a, Message> = match catalog.previews().image(tour.preview) {
        Some(handle) => image(handle.clone())
            .width(Length::Fill)
            .height(CARD_IMAGE_HEIGHT)
            .content_fit(ContentFit::Cover)
            .into(),
        None => placeholder("unavailable".to_string()),
    };

    column![
        preview,
        column![
            text(&tour.name).size(16),
            text(tour.date.format("%Y-%m-%d %H:%M").to_string()).size(12),
        ]
        .spacing(2)
        .padding(10),
    ]
    .into()
}

fn virtual_card<'a>(tour: &'a VirtualTour) -> Element<'a, Message> {
    // Remote previews aren't fetched; show where the card leads instead
    let host = link_host(&tour.external_link).unwrap_or(tour.external_link.as_str());

    column![
        placeholder(format!("↗ {host}")),
        container(text(&tour.name).size(16)).padding(10),
    ]
    .into()
}

fn placeholder<'a>(label: String) -> Element<'a, Message> {
    container(text(label).size(14))
        .width(Length::Fill)
        .height(CARD_IMAGE_HEIGHT)
        .center_x(Length::Fill)
        .center_y(Length::Fixed(CARD_IMAGE_HEIGHT))
        .into()
}

/// "http://host:8081/path" -> "host:8081"
fn link_host(link: &str) -> Option<&str> {
    let rest = link.split_once("://").map(|(_, rest)| rest)?;
    rest.split('/').next().filter(|host| !host.is_empty())
}
