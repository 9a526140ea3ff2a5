//! Minimal English/Russian message table for the texts the client shows
//! through host popups and buttons.

use chrono::Weekday;

/// Interface language, picked from the Telegram user's `language_code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    Ru,
}

impl Language {
    /// Anything that is not Russian falls back to English.
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(|c| c.trim().to_ascii_lowercase()) {
            Some(c) if c == "ru" || c.starts_with("ru-") => Language::Ru,
            _ => Language::En,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ru => "ru",
        }
    }

    pub fn month_name(self, month: u32) -> &'static str {
        const EN: [&str; 12] = [
            "January", "February", "March", "April", "May", "June", "July", "August",
            "September", "October", "November", "December",
        ];
        const RU: [&str; 12] = [
            "Январь", "Февраль", "Март", "Апрель", "Май", "Июнь", "Июль", "Август",
            "Сентябрь", "Октябрь", "Ноябрь", "Декабрь",
        ];
        let index = (month.clamp(1, 12) - 1) as usize;
        match self {
            Language::En => EN[index],
            Language::Ru => RU[index],
        }
    }

    /// Month name as used inside a date ("18 августа"), genitive in Russian.
    pub fn month_in_date(self, month: u32) -> &'static str {
        const RU_GENITIVE: [&str; 12] = [
            "января", "февраля", "марта", "апреля", "мая", "июня", "июля", "августа",
            "сентября", "октября", "ноября", "декабря",
        ];
        match self {
            Language::En => self.month_name(month),
            Language::Ru => RU_GENITIVE[(month.clamp(1, 12) - 1) as usize],
        }
    }

    pub fn weekday_short(self, day: Weekday) -> &'static str {
        let index = day.num_days_from_monday() as usize;
        match self {
            Language::En => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"][index],
            Language::Ru => ["Пн", "Вт", "Ср", "Чт", "Пт", "Сб", "Вс"][index],
        }
    }

    pub fn weekday_long(self, day: Weekday) -> &'static str {
        let index = day.num_days_from_monday() as usize;
        match self {
            Language::En => ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"][index],
            Language::Ru => ["понедельник", "вторник", "среда", "четверг", "пятница", "суббота", "воскресенье"][index],
        }
    }

    pub fn text(self, message: Message) -> &'static str {
        let (en, ru) = message.texts();
        match self {
            Language::En => en,
            Language::Ru => ru,
        }
    }
}

/// Every user-facing text the flows can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    FormNoTitle,
    FormNoSlots,
    FormNoTitleNoSlots,
    TitleTooLong,
    DescriptionTooLong,
    LocationTooLong,
    TemplateInvalidRange,
    DuplicateTime,
    NoFreeTime,
    NonexistentTime,
    InvalidTime,
    ConfirmRemoveAllSlots,
    ConfirmRemoveVotedDate,
    ConfirmRemoveBookedDate,
    ConfirmRemoveVotedSlot,
    ConfirmRemoveBookedSlot,
    CreateEventButton,
    SaveChangesButton,
    CancelButton,
    ErrorCreatingEvent,
    ErrorUpdatingEvent,
    ConfirmChoiceButton,
    EditSelectionButton,
    SelectionConfirmed,
    ErrorSubmittingVotes,
    FinalizeButton,
    CancelEventButton,
    EditEventButton,
    UnfinalizeButton,
    ConfirmDeleteEvent,
    EventDeleted,
    ErrorDeletingEvent,
    EventFinalized,
    ErrorFinalizingEvent,
    ConfirmUnfinalize,
    EventUnfinalized,
    ErrorUnfinalizingEvent,
    AddToCalendar,
    GoogleCalendar,
    DownloadIcs,
    NoEventData,
    InvalidStartTime,
    MultipleChoiceNeedsTwoSlots,
    LocationRequired,
    ErrorLoadingEvent,
    ErrorLoadingEvents,
    MyEventsTab,
    OtherEventsTab,
    CalendarSubtitle,
    YandexCalendarHint,
    SharePoll,
    ShareBooking,
    SharePollWithTitle,
    ShareBookingWithTitle,
}

impl Message {
    fn texts(self) -> (&'static str, &'static str) {
        match self {
            Message::FormNoTitle => ("Please enter an event title", "Введите название события"),
            Message::FormNoSlots => ("Please pick at least one date and time", "Выберите хотя бы одну дату и время"),
            Message::FormNoTitleNoSlots => (
                "Please enter a title and pick at least one date and time",
                "Введите название и выберите хотя бы одну дату и время",
            ),
            Message::TitleTooLong => ("The title is too long (max 100 characters)", "Название слишком длинное (максимум 100 символов)"),
            Message::DescriptionTooLong => ("The description is too long (max 500 characters)", "Описание слишком длинное (максимум 500 символов)"),
            Message::LocationTooLong => ("The location is too long (max 500 characters)", "Место слишком длинное (максимум 500 символов)"),
            Message::TemplateInvalidRange => ("Start time must be before end time", "Время начала должно быть меньше времени окончания"),
            Message::DuplicateTime => ("This time is already added for the date", "Это время уже добавлено для этой даты"),
            Message::NoFreeTime => ("There is no free time left on this date", "На эту дату не осталось свободного времени"),
            Message::NonexistentTime => (
                "This time does not exist on that date because of the clock change",
                "Этого времени нет в эту дату из-за перевода часов",
            ),
            Message::InvalidTime => ("Please enter the time as HH:MM", "Введите время в формате ЧЧ:ММ"),
            Message::ConfirmRemoveAllSlots => ("Remove all dates and times?", "Удалить все даты и время?"),
            Message::ConfirmRemoveVotedDate => (
                "Participants already voted for this date. Remove it anyway?",
                "За эту дату уже проголосовали. Всё равно удалить?",
            ),
            Message::ConfirmRemoveBookedDate => (
                "Slots on this date are already booked. Remove it anyway?",
                "На эту дату уже есть бронирования. Всё равно удалить?",
            ),
            Message::ConfirmRemoveVotedSlot => (
                "Participants already voted for this time. Remove it anyway?",
                "За это время уже проголосовали. Всё равно удалить?",
            ),
            Message::ConfirmRemoveBookedSlot => (
                "This time is already booked. Remove it anyway?",
                "Это время уже забронировано. Всё равно удалить?",
            ),
            Message::CreateEventButton => ("Create event", "Создать событие"),
            Message::SaveChangesButton => ("Save changes", "Сохранить изменения"),
            Message::CancelButton => ("Cancel", "Отмена"),
            Message::ErrorCreatingEvent => ("Could not create the event", "Не удалось создать событие"),
            Message::ErrorUpdatingEvent => ("Could not save the changes", "Не удалось сохранить изменения"),
            Message::ConfirmChoiceButton => ("Confirm choice", "Подтвердить выбор"),
            Message::EditSelectionButton => ("Change choice", "Изменить выбор"),
            Message::SelectionConfirmed => ("Your choice is saved", "Ваш выбор сохранён"),
            Message::ErrorSubmittingVotes => ("Could not save your choice", "Не удалось сохранить выбор"),
            Message::FinalizeButton => ("Finalize this time", "Выбрать это время"),
            Message::CancelEventButton => ("Cancel event", "Отменить событие"),
            Message::EditEventButton => ("Edit event", "Редактировать событие"),
            Message::UnfinalizeButton => ("Reopen poll", "Возобновить опрос"),
            Message::ConfirmDeleteEvent => ("Cancel this event for everyone?", "Отменить событие для всех?"),
            Message::EventDeleted => ("The event was cancelled", "Событие отменено"),
            Message::ErrorDeletingEvent => ("Could not cancel the event", "Не удалось отменить событие"),
            Message::EventFinalized => ("The time is fixed", "Время зафиксировано"),
            Message::ErrorFinalizingEvent => ("Could not finalize the event", "Не удалось зафиксировать время"),
            Message::ConfirmUnfinalize => ("Reopen the poll?", "Возобновить опрос?"),
            Message::EventUnfinalized => ("The poll is open again", "Опрос снова открыт"),
            Message::ErrorUnfinalizingEvent => ("Could not reopen the poll", "Не удалось возобновить опрос"),
            Message::AddToCalendar => ("Add to Calendar", "Добавить в календарь"),
            Message::GoogleCalendar => ("Google Calendar", "Google Календарь"),
            Message::DownloadIcs => (".ICS", ".ICS"),
            Message::NoEventData => ("No event data found in URL parameters", "Данные события не найдены в параметрах URL"),
            Message::InvalidStartTime => ("Invalid start time format", "Неверный формат времени начала"),
            Message::MultipleChoiceNeedsTwoSlots => (
                "Multiple choice needs at least two time slots",
                "Для множественного выбора нужно минимум два слота",
            ),
            Message::LocationRequired => (
                "Please add a location before fixing the time",
                "Укажите место перед тем, как зафиксировать время",
            ),
            Message::ErrorLoadingEvent => ("Could not load the event", "Не удалось загрузить событие"),
            Message::ErrorLoadingEvents => ("Could not load your events", "Не удалось загрузить события"),
            Message::MyEventsTab => ("My events", "Мои события"),
            Message::OtherEventsTab => ("Other events", "Другие события"),
            Message::CalendarSubtitle => ("Choose your preferred calendar app", "Выберите приложение календаря"),
            Message::YandexCalendarHint => (
                "For Yandex Calendar use import from .ICS file",
                "Для Яндекс Календаря используйте импорт из .ICS файла",
            ),
            // "{title}" is substituted by the share helpers.
            Message::SharePoll => ("Vote for a time slot", "Прими участие в опросе за выбор времени"),
            Message::ShareBooking => ("Book a time slot", "Забронируй свободное время"),
            Message::SharePollWithTitle => (
                "Vote for a time slot in \u{201c}{title}\u{201d}",
                "Прими участие в опросе за выбор времени в событии \u{ab}{title}\u{bb}",
            ),
            Message::ShareBookingWithTitle => (
                "Book a time slot in \u{201c}{title}\u{201d}",
                "Забронируй свободное время в событии \u{ab}{title}\u{bb}",
            ),
        }
    }
}
