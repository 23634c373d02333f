/*!

This is the long-form manual for `event_normalizer` and `hivecal`.

## Input formats

The following formats are supported by `hivecal`:
* `csv` Comma Separated Values, as exported by Google Sheets (File > Download > CSV)
* `xlsx` Excel workbooks, as exported by Google Sheets or Excel

Each sheet is one of three kinds:
* `events` the community calendar (default)
* `metrics` headline figures (label, value, unit)
* `news` links to articles (title, url, source)

### `csv`

The first row holds the headers. Rows may be shorter than the header row,
missing cells are treated as empty. Rows where every cell is blank are skipped.

```text
Evento,Fecha inicio,Fecha fin,Funds,País,Tag,Tag2
Hive Meetup Warsaw,2024-01-10,2024-01-11,"1.200,50",Poland (EU),#hive-meetup,hive-108943
Workshop,,,,,,
```

If the header row is not the first row, set `headerRowIndex` in the configuration.

### `xlsx`

The first worksheet is read, unless `excelWorksheetName` is given. Cells are
read as text: numbers in their shortest form (`1200.5`), dates as
`YYYY-MM-DD` (or `YYYY-MM-DD HH:MM` when they carry a time), booleans as
`true`/`false`, errors as empty cells.

## Header spellings

Columns are matched by the normalized header label: accents removed, spaces
removed, lowercase. So `Fecha de Inicio`, `fecha de inicio` and `FECHADEINICIO`
all read as `fechadeinicio`. A column is picked when its normalized label is
equal to one of the keywords of the field, or else contains one of them.
A handful of short legacy labels are only matched when the whole normalized
label is equal to them, so `END` or `End ` read as the end date while
`Attendees` does not.

| field              | keywords                                                      | exact labels                       |
|--------------------|---------------------------------------------------------------|------------------------------------|
| `startDate`        | startdate, starttime, fechainicio, fechadeinicio              | start, fecha, date                 |
| `endDate`          | enddate, endtime, fechafin, fechadefin, finish                | end, fin                           |
| `title`            | evento, eventname, eventtitle, title, titulo                  | event, name, nombre                |
| `funds`            | funds, fondos, presupuesto, budget                            | hbd                                |
| `image`            | imagelink, image, imagen                                      | img                                |
| `description`      | shortdescription, resumen, summary                            | description, descripcion           |
| `country`          | country, pais, location, ubicacion                            | place, lugar                       |
| `tag`              | tag1, hivetag, topictag                                       | tag, tags, etiqueta                |
| `tag2`             | tag2, communitytag, community, comunidad                      | tag2                               |
| `onboardingCount`  | onboarding, onboarded, newusers, nuevosusuarios               |                                    |
| `eventDescription` | eventdescription, descripciondelevento, eventdetails, detalles|                                    |
| `attendees`        | attendees, asistentes, participants, participantes            |                                    |
| `benefit`          | benefit, beneficio                                            |                                    |
| `potential`        | potential, potencial                                          |                                    |

## Values

- Amounts accept both `1.200,50` and `1,200.50`. Currency symbols and
  spaces are ignored (`12 HBD`, `$ 1 200`). Unreadable and negative amounts
  count as 0.
- Dates in `YYYY-MM-DD` form are midnight local time. `YYYY-MM-DD HH:MM`,
  RFC 3339 and a few day-first and month-first formats are also read.
  Unreadable dates are treated as missing.
- Places keep only their last comma-separated part, so `Caracas, Venezuela`
  and `Venezuela` are grouped together.
- Tags are reduced to slugs (`#Hive Onboarding!` becomes `hive-onboarding`).
- Onboarding counts read the leading whole number; `1.200` and `1,200` are
  both 1200.
- An event with an end date but no start date counts as past. Only events
  with neither date are undated.

## Configuration

`hivecal` runs with sensible defaults, but a configuration file in JSON can
describe several sheets at once and override the header spellings.

```text
{
  "outputSettings": {
    "dashboardName": "Hive events 2024",
    "referenceTime": "2024-06-15T10:00:00",
    "showPast": false,
    "topEvents": 5
  },
  "sheetSources": [
    { "provider": "csv", "kind": "events", "filePath": "calendar.csv" },
    { "provider": "xlsx", "kind": "news", "filePath": "news.xlsx", "excelWorksheetName": "Noticias" }
  ],
  "fieldSpecs": {
    "title": { "positions": ["B"], "keywords": ["evento"], "legacyKeys": [] }
  }
}
```

`positions` are 1-based column numbers or Excel column letters. They only apply
when the header row is known and win over the keywords. A field listed in
`fieldSpecs` replaces the default spellings of that field entirely.

Command line flags override the values of the configuration file.

 */
