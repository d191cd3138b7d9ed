//! Markup for each page section.

use super::RevealMarks;
use crate::model::portfolio::{
    AboutData, ContactData, DiplomaCard, FooterData, HeroData, LanguageBar, ProjectCard,
    SkillBar, SkillsData, SocialLink,
};
use crate::model::section::SectionKind;
use maud::{html, Markup};

pub(crate) fn hero(hero: &HeroData, marks: &RevealMarks<'_>) -> Markup {
    let section = SectionKind::Hero;
    let content = marks.get(section, "hero-content");
    let show_stats = hero.show_stats && !hero.stats.is_empty();
    html! {
        section.hero id=(section.anchor()) {
            div.hero-content.fade-item data-reveal=(content.label) data-reveal-index=(content.slot) style=[content.style] {
                @if let Some(image) = &hero.image {
                    img.hero-image src=(image) alt=(hero.name);
                }
                h1.hero-name { (hero.name) }
                @if let Some(title) = &hero.title {
                    p.hero-title { (title) }
                }
                @if let Some(subtitle) = &hero.subtitle {
                    p.hero-subtitle { (subtitle) }
                }
                @if let Some(description) = &hero.description {
                    p.hero-description { (description) }
                }
                div.hero-actions {
                    @if let Some(cta) = &hero.cta {
                        a.hero-cta href={ "#" (SectionKind::Projects.anchor()) } { (cta) }
                    }
                    a.hero-contact href={ "#" (SectionKind::Contact.anchor()) } { "Contáctame" }
                }
                @if show_stats {
                    dl.hero-stats {
                        @for stat in &hero.stats {
                            div.hero-stat {
                                dt { (stat.label) }
                                dd { (stat.value) }
                            }
                        }
                    }
                }
            }
        }
    }
}

pub(crate) fn about(about: &AboutData, marks: &RevealMarks<'_>) -> Markup {
    let section = SectionKind::About;
    let title = marks.get(section, "about-title");
    let image = marks.get(section, "about-image");
    let story = marks.get(section, "about-story");
    html! {
        section.about id=(section.anchor()) {
            div.section-title.fade-item data-reveal=(title.label) data-reveal-index=(title.slot) style=[title.style] {
                h2 { (about.title) }
                @if let Some(description) = &about.description {
                    p.section-subtitle { (description) }
                }
            }
            @if let Some(src) = &about.image {
                div.about-image.fade-item data-reveal=(image.label) data-reveal-index=(image.slot) style=[image.style] {
                    img src=(src) alt=(about.title) loading="lazy";
                }
            }
            div.about-story.fade-item data-reveal=(story.label) data-reveal-index=(story.slot) style=[story.style] {
                @for paragraph in &about.story {
                    p { (paragraph) }
                }
            }
            @if !about.values.is_empty() {
                div.about-values {
                    @for (index, value) in about.values.iter().enumerate() {
                        @let mark = marks.get(section, &format!("about-value-{index}"));
                        article.value-card.fade-item data-reveal=(mark.label) data-reveal-index=(mark.slot) style=[mark.style] {
                            @if let Some(icon) = &value.icon {
                                span.icon data-icon=(icon) {}
                            }
                            h3 { (value.title) }
                            @if let Some(description) = &value.description {
                                p { (description) }
                            }
                        }
                    }
                }
            }
        }
    }
}

pub(crate) fn projects(projects: &[ProjectCard], marks: &RevealMarks<'_>) -> Markup {
    let section = SectionKind::Projects;
    let title = marks.get(section, "projects-title");
    html! {
        section.projects id=(section.anchor()) {
            div.section-title.fade-item data-reveal=(title.label) data-reveal-index=(title.slot) style=[title.style] {
                h2 { "Proyectos" }
            }
            div.project-grid {
                @for (index, project) in projects.iter().enumerate() {
                    @let mark = marks.get(section, &format!("project-{index}"));
                    article.project-card.fade-item data-project-id=(project.id) data-accent=[project.color.as_deref()] data-reveal=(mark.label) data-reveal-index=(mark.slot) style=[mark.style] {
                        @if let Some(image) = &project.image {
                            img src=(image) alt=(project.title) loading="lazy";
                        }
                        @if let Some(category) = &project.category {
                            span.project-category { (category) }
                        }
                        h3 { (project.title) }
                        @if let Some(description) = &project.description {
                            p { (description) }
                        }
                        @if !project.technologies.is_empty() {
                            ul.tech-list {
                                @for tech in &project.technologies {
                                    li { (tech) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

pub(crate) fn skills(skills: &SkillsData, marks: &RevealMarks<'_>) -> Markup {
    let section = SectionKind::Skills;
    let title = marks.get(section, "skills-title");
    let technical = marks.get(section, "skills-technical");
    let languages = marks.get(section, "skills-languages");
    html! {
        section.skills id=(section.anchor()) {
            div.section-title.fade-item data-reveal=(title.label) data-reveal-index=(title.slot) style=[title.style] {
                h2 { "Habilidades" }
            }
            div.skills-technical.fade-item data-reveal=(technical.label) data-reveal-index=(technical.slot) style=[technical.style] {
                h3 { "Habilidades Técnicas" }
                @for skill in &skills.technical {
                    (skill_bar(skill))
                }
            }
            div.skills-languages.fade-item data-reveal=(languages.label) data-reveal-index=(languages.slot) style=[languages.style] {
                h3 { "Idiomas" }
                @for language in &skills.languages {
                    (language_bar(language))
                }
                @if !skills.additional_info.is_empty() {
                    div.additional-info {
                        h4 { "Información Adicional" }
                        ul {
                            @for item in &skills.additional_info {
                                li { (item) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn skill_bar(skill: &SkillBar) -> Markup {
    html! {
        div.skill-bar {
            @if let Some(icon) = &skill.icon {
                span.icon data-icon=(icon) {}
            }
            span.skill-name { (skill.name) }
            span.skill-level { (skill.level.get()) "%" }
            div.bar-track {
                div.bar-fill style={ "width: " (skill.level.get()) "%" } {}
            }
        }
    }
}

fn language_bar(language: &LanguageBar) -> Markup {
    html! {
        div.language-bar {
            @if let Some(flag) = &language.flag {
                span.flag { (flag) }
            }
            span.skill-name { (language.name) }
            span.skill-level { (language.level.get()) "%" }
            div.bar-track {
                div.bar-fill style={ "width: " (language.level.get()) "%" } {}
            }
        }
    }
}

pub(crate) fn diplomas(diplomas: &[DiplomaCard], marks: &RevealMarks<'_>) -> Markup {
    let section = SectionKind::Diplomas;
    let title = marks.get(section, "diplomas-title");
    html! {
        section.diplomas id=(section.anchor()) {
            div.section-title.fade-item data-reveal=(title.label) data-reveal-index=(title.slot) style=[title.style] {
                h2 { "Diplomas" }
            }
            div.diploma-grid {
                @for (index, diploma) in diplomas.iter().enumerate() {
                    @let mark = marks.get(section, &format!("diploma-{index}"));
                    article.diploma-card.fade-item data-diploma-id=(diploma.id) data-reveal=(mark.label) data-reveal-index=(mark.slot) style=[mark.style] {
                        @if let Some(icon) = &diploma.icon {
                            span.icon data-icon=(icon) {}
                        }
                        h3 { (diploma.title) }
                        @if let Some(institution) = &diploma.institution {
                            p.institution { (institution) }
                        }
                        @if let Some(year) = &diploma.year {
                            span.year { (year) }
                        }
                    }
                }
            }
        }
    }
}

pub(crate) fn contact(contact: &ContactData, marks: &RevealMarks<'_>) -> Markup {
    let section = SectionKind::Contact;
    let title = marks.get(section, "contact-title");
    let info = marks.get(section, "contact-info");
    let form = marks.get(section, "contact-form");
    html! {
        section.contact id=(section.anchor()) {
            div.section-title.fade-item data-reveal=(title.label) data-reveal-index=(title.slot) style=[title.style] {
                h2 { (contact.title) }
                @if let Some(subtitle) = &contact.subtitle {
                    p.section-subtitle { (subtitle) }
                }
            }
            div.contact-info.fade-item data-reveal=(info.label) data-reveal-index=(info.slot) style=[info.style] {
                ul.contact-details {
                    @if let Some(email) = &contact.email {
                        li { span.label { "Email" } a href={ "mailto:" (email) } { (email) } }
                    }
                    @if let Some(phone) = &contact.phone {
                        li { span.label { "Teléfono" } a href={ "tel:" (dial_string(phone)) } { (phone) } }
                    }
                    @if let Some(location) = &contact.location {
                        li { span.label { "Ubicación" } span { (location) } }
                    }
                }
                @if !contact.social.is_empty() {
                    div.social-links {
                        @for link in &contact.social {
                            (social_link(link))
                        }
                    }
                }
            }
            div.contact-form.fade-item data-reveal=(form.label) data-reveal-index=(form.slot) style=[form.style] {
                form id="contact-form" method="post" {
                    label for="name" { "Nombre" }
                    input id="name" name="name" type="text" required placeholder="Tu nombre completo";
                    label for="email" { "Email" }
                    input id="email" name="email" type="email" required placeholder="tu@email.com";
                    label for="subject" { "Asunto" }
                    input id="subject" name="subject" type="text" required placeholder="Asunto del mensaje";
                    label for="message" { "Mensaje" }
                    textarea id="message" name="message" rows="6" required placeholder="Escribe tu mensaje aquí..." {}
                    button type="submit" { "Enviar Mensaje" }
                }
            }
        }
    }
}

fn social_link(link: &SocialLink) -> Markup {
    html! {
        @if let Some(text) = &link.text {
            a.social-button href=(link.url) target="_blank" rel="noopener noreferrer" {
                @if let Some(icon) = &link.icon {
                    span.icon data-icon=(icon) {}
                }
                span.social-name { (link.name) }
                span.social-text { (text) }
            }
        } @else {
            a.social-icon href=(link.url) target="_blank" rel="noopener noreferrer" aria-label=(link.name) {
                span.icon data-icon=[link.icon.as_deref()] {}
            }
        }
    }
}

/// Phone number without spaces or separators, keeping a leading `+`.
fn dial_string(phone: &str) -> String {
    phone
        .chars()
        .enumerate()
        .filter(|(index, c)| c.is_ascii_digit() || (*index == 0 && *c == '+'))
        .map(|(_, c)| c)
        .collect()
}

pub(crate) fn footer(footer: &FooterData, brand: &str) -> Markup {
    html! {
        footer.site-footer id=(SectionKind::Footer.anchor()) {
            div.footer-brand {
                span.brand { (brand) }
                @if let Some(copyright) = &footer.copyright {
                    span.copyright { (copyright) }
                }
            }
            @if !footer.legal.is_empty() {
                nav.legal-links {
                    @for (index, item) in footer.legal.iter().enumerate() {
                        @if index > 0 {
                            span.separator { "|" }
                        }
                        a href=(item.link) { (item.text) }
                    }
                }
            }
        }
    }
}
